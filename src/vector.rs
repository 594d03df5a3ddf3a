use std::ops::{Neg, Add, AddAssign, Sub, SubAssign, Mul, MulAssign, Div, DivAssign};
use std::fmt;

use crate::error::AttitudeError;

/// A 3D vector of `f32` components.
///
/// Plain value type with no invariants. The zero vector is valid; see
/// [`Vec3::normalized`] for how it is handled there.
#[repr(C)]
#[derive(PartialEq, Clone, Copy, Default, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// A 2D vector embedded in 3D space, z = 0.
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0)
    }

    pub fn len(&self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn len_sq(&self) -> f32 {
        self.x*self.x + self.y*self.y + self.z*self.z
    }

    pub fn dot(&self, vec: Vec3) -> f32 {
        self.x*vec.x + self.y*vec.y + self.z*vec.z
    }

    /// Right-handed cross product.
    pub fn cross(&self, vec: Vec3) -> Self {
        Self::new(
            self.y*vec.z - self.z*vec.y,
            self.z*vec.x - self.x*vec.z,
            self.x*vec.y - self.y*vec.x,
        )
    }

    /// Returns the unit vector pointing in the same direction, or the
    /// zero vector if the magnitude is zero.
    pub fn normalized(&self) -> Self {
        let len = self.len();
        if len == 0.0 {
            return Self::zero();
        }
        *self / len
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z
        };
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        *self = Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z
        };
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Self::new(self.x * other, self.y * other, self.z * other)
    }
}

impl MulAssign<f32> for Vec3 {
    fn mul_assign(&mut self, other: f32) {
        *self = *self * other;
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;

    fn div(self, other: f32) -> Self::Output {
        Self::new(self.x / other, self.y / other, self.z / other)
    }
}

impl DivAssign<f32> for Vec3 {
    fn div_assign(&mut self, other: f32) {
        *self = *self / other;
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;

    fn mul(self, vec: Vec3) -> Self::Output {
        vec * self
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(arr: [f32; 3]) -> Vec3 {
        Vec3::new(arr[0], arr[1], arr[2])
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(vec: Vec3) -> [f32; 3] {
        [vec.x, vec.y, vec.z]
    }
}

impl TryFrom<&[f32]> for Vec3 {
    type Error = AttitudeError;

    /// Reads the first three elements as x, y, z. Fails if the slice
    /// holds fewer than three.
    fn try_from(slice: &[f32]) -> Result<Vec3, Self::Error> {
        if slice.len() < 3 {
            return Err(AttitudeError::SliceTooShort(3, slice.len()));
        }
        Ok(Vec3::new(slice[0], slice[1], slice[2]))
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}


#[cfg(test)]
fn vec_close(a: Vec3, b: Vec3) -> bool {
    (a - b).len() < 1e-5
}

#[test]
fn cross_test() {
    let v  = Vec3::new(4.0, 3.0, 6.0);
    let v2 = Vec3::new(2.0, 9.0, 3.0);

    let cross = v.cross(v2);
    assert!(cross == Vec3::new(-45.0, 0.0, 30.0));
    assert!(v2.cross(v) == -cross);
}

#[test]
fn dot_test() {
    let v  = Vec3::new(4.0, 3.0, 6.0);
    let v2 = Vec3::new(2.0, 9.0, 3.0);

    let dot = v.dot(v2);
    assert!(dot == 53.0);
    assert!(v2.dot(v) == dot);
}

#[test]
fn unit_basis_cross() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);

    assert!(x.cross(y) == Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn cross_self_is_zero() {
    let v = Vec3::new(0.2, -7.5, 3.3);
    assert!(v.cross(v) == Vec3::zero());
}

#[test]
fn add_sub_neg() {
    let mut v = Vec3::new(1.0, -2.0, 4.0);
    let v2 = Vec3::new(0.5, 3.0, -1.0);

    assert!(v + v2 == Vec3::new(1.5, 1.0, 3.0));
    assert!(v - v2 == Vec3::new(0.5, -5.0, 5.0));
    assert!(-v == Vec3::new(-1.0, 2.0, -4.0));

    v += v2;
    assert!(v == Vec3::new(1.5, 1.0, 3.0));
    v -= v2;
    assert!(v == Vec3::new(1.0, -2.0, 4.0));
}

#[test]
fn scalar_ops() {
    let mut v = Vec3::new(1.0, -2.0, 4.0);

    assert!(v * 2.0 == Vec3::new(2.0, -4.0, 8.0));
    assert!(2.0 * v == v * 2.0);
    assert!(v / 2.0 == Vec3::new(0.5, -1.0, 2.0));

    v *= 2.0;
    assert!(v == Vec3::new(2.0, -4.0, 8.0));
    v /= 2.0;
    assert!(v == Vec3::new(1.0, -2.0, 4.0));
}

#[test]
fn scalar_div_by_zero() {
    let v = Vec3::new(1.0, 2.0, 4.0) / 0.0;
    assert!(v.x.is_infinite() && v.y.is_infinite() && v.z.is_infinite());
}

#[test]
fn magnitude() {
    let v = Vec3::new(3.0, 4.0, 0.0);
    assert!(v.len() == 5.0);
    assert!(v.len_sq() == 25.0);
    assert!(Vec3::zero().len() == 0.0);
}

#[test]
fn normalize() {
    let v = Vec3::new(3.0, 4.0, 0.0);
    assert!(v.normalized() == Vec3::new(0.6, 0.8, 0.0));

    let v = Vec3::new(-1.22, 0.05, 7.7);
    assert!((v.normalized().len() - 1.0).abs() < 1e-6);
    assert!(vec_close(v.normalized() * v.len(), v));
}

#[test]
fn normalize_zero_is_zero() {
    assert!(Vec3::zero().normalized() == Vec3::zero());
}

#[test]
fn from_xy_embeds_in_3d() {
    let v = Vec3::from_xy(4.0, -2.5);
    assert!(v == Vec3::new(4.0, -2.5, 0.0));
}

#[test]
fn array_conversions() {
    let v = Vec3::from([1.0, 2.0, 3.0]);
    assert!(v == Vec3::new(1.0, 2.0, 3.0));

    let arr: [f32; 3] = v.into();
    assert!(arr == [1.0, 2.0, 3.0]);
}

#[test]
fn try_from_slice() {
    let v = Vec3::try_from(&[1.0, 2.0, 3.0, 9.0][..]).unwrap();
    assert!(v == Vec3::new(1.0, 2.0, 3.0));

    assert!(Vec3::try_from(&[1.0, 2.0][..]).is_err());
}

#[test]
fn pod_cast() {
    let v = Vec3::new(0.25, -8.0, 1.5);
    let bytes = bytemuck::bytes_of(&v);
    assert!(bytes.len() == 12);
    assert!(*bytemuck::from_bytes::<Vec3>(bytes) == v);
}
