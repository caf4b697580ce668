use crate::nalgebra_types::*;

/// Axis aligned box, used to report the extent of a loaded mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct AABB<T: RealField, const D: usize> {
    pub min: SVector<T, D>,
    pub max: SVector<T, D>,
}

impl<T: RealField, const D: usize> AABB<T, D> {
    pub fn from_points(min: SVector<T, D>, max: SVector<T, D>) -> AABB<T, D> {
        AABB { min, max }
    }

    pub fn from_point(c: SVector<T, D>) -> AABB<T, D> {
        AABB {
            min: c.clone(),
            max: c,
        }
    }

    pub fn mut_add_point(&mut self, p: &SVector<T, D>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }
}

impl<T: RealField, const D: usize> std::fmt::Display for AABB<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.min.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "] .. [")?;
        for (i, c) in self.max.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, "]")
    }
}
