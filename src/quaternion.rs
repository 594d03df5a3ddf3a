use std::ops::{Neg, Add, AddAssign, Sub, SubAssign, Mul, MulAssign, Div, DivAssign};
use std::fmt;

use crate::Frame;
use crate::error::AttitudeError;
use crate::vector::Vec3;

/// A quaternion `w + x·i + y·j + z·k`, stored as a scalar part `w` and
/// a vector part `v`.
///
/// Unit quaternions represent rotations. The arithmetic operators treat
/// the type as a general 4D algebra element and do not preserve the unit
/// norm; renormalize after accumulating products.
#[repr(C)]
#[derive(PartialEq, Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quaternion {
    pub w: f32,
    pub v: Vec3,
}
impl Quaternion {
    pub fn new(w: f32, xi: f32, yj: f32, zk: f32) -> Self {
        Self {
            w,
            v: Vec3::new(xi, yj, zk),
        }
    }

    pub fn from_parts(w: f32, v: Vec3) -> Self {
        Self { w, v }
    }

    /// The multiplicative identity, representing no rotation.
    pub fn identity() -> Self {
        Self::from_parts(1.0, Vec3::zero())
    }

    /// Conjugate: the vector part negated, the scalar part kept.
    pub fn conj(&self) -> Self {
        Self::from_parts(self.w, -self.v)
    }

    /// 4D dot product, treating (w, v) as a 4-vector.
    pub fn dot(&self, quat: Quaternion) -> f32 {
        self.w*quat.w + self.v.dot(quat.v)
    }

    /// Squared magnitude, `w² + v·v`.
    pub fn inner(&self) -> f32 {
        self.dot(*self)
    }

    pub fn len(&self) -> f32 {
        self.inner().sqrt()
    }

    /// Returns the unit quaternion with the same direction, or the
    /// identity if the magnitude is zero.
    pub fn normalized(&self) -> Self {
        let len = self.len();
        if len == 0.0 {
            return Self::identity();
        }
        *self / len
    }

    /// Multiplicative inverse, the conjugate scaled by the reciprocal
    /// squared magnitude. The inverse of the zero quaternion has NaN
    /// components.
    pub fn inverse(&self) -> Self {
        self.conj() / self.inner()
    }

    /// Builds the unit quaternion for a rotation of `angle` radians
    /// about `axis`, following the right-hand rule. The axis is
    /// normalized internally, so it need not be a unit vector.
    ///
    /// With [`Frame::Global`] the result maps body coordinates to
    /// global coordinates when applied with `rotate(Frame::Global, _)`;
    /// with [`Frame::Local`] it is the conjugate of that quaternion.
    /// Constructing and rotating with the same frame always gives the
    /// right-hand-rule rotation by `angle`.
    pub fn from_axis_angle(frame: Frame, axis: Vec3, angle: f32) -> Self {
        let half = angle * 0.5;
        let sin = match frame {
            Frame::Global => half.sin(),
            Frame::Local => -half.sin(),
        };
        Self::from_parts(half.cos(), axis.normalized() * sin)
    }

    /// Axis/angle form with the angle carried by the axis: `rotation`
    /// points along the rotation axis and its magnitude is the angle in
    /// radians, the shape of a gyro increment `ω·dt`. The zero vector
    /// gives the identity.
    pub fn from_rotation(frame: Frame, rotation: Vec3) -> Self {
        Self::from_axis_angle(frame, rotation, rotation.len())
    }

    /// In-place form of [`Quaternion::from_axis_angle`].
    pub fn set_axis_angle(&mut self, frame: Frame, axis: Vec3, angle: f32) {
        *self = Self::from_axis_angle(frame, axis, angle);
    }

    /// In-place form of [`Quaternion::from_rotation`].
    pub fn set_rotation(&mut self, frame: Frame, rotation: Vec3) {
        *self = Self::from_rotation(frame, rotation);
    }

    /// Rotates `vec` by the sandwich product: `q·p·q̄` for
    /// [`Frame::Global`], `q̄·p·q` for [`Frame::Local`], where `p` is
    /// `vec` lifted to a pure quaternion. The two frames are mutually
    /// inverse maps.
    ///
    /// Uses the conjugate rather than the full inverse, so the caller
    /// is trusted to pass a unit quaternion.
    pub fn rotate(&self, frame: Frame, vec: Vec3) -> Vec3 {
        let p = Quaternion::from(vec);
        match frame {
            Frame::Global => (*self * p * self.conj()).v,
            Frame::Local => (self.conj() * p * *self).v,
        }
    }

    /// Image of the x basis vector under [`Quaternion::rotate`], one
    /// column (`Global`) or row (`Local`) of the rotation matrix.
    pub fn axis_x(&self, frame: Frame) -> Vec3 {
        self.rotate(frame, Vec3::new(1.0, 0.0, 0.0))
    }

    pub fn axis_y(&self, frame: Frame) -> Vec3 {
        self.rotate(frame, Vec3::new(0.0, 1.0, 0.0))
    }

    pub fn axis_z(&self, frame: Frame) -> Vec3 {
        self.rotate(frame, Vec3::new(0.0, 0.0, 1.0))
    }
}

impl Default for Quaternion {
    /// Defaults to the identity, so a fresh quaternion is a valid
    /// rotation before any `set_*` call.
    fn default() -> Self {
        Self::identity()
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_parts(-self.w, -self.v)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::from_parts(self.w + other.w, self.v + other.v)
    }
}

impl AddAssign for Quaternion {
    fn add_assign(&mut self, other: Self) {
        *self = Self {
            w: self.w + other.w,
            v: self.v + other.v
        };
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::from_parts(self.w - other.w, self.v - other.v)
    }
}

impl SubAssign for Quaternion {
    fn sub_assign(&mut self, other: Self) {
        *self = Self {
            w: self.w - other.w,
            v: self.v - other.v
        };
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, other: f32) -> Self::Output {
        Self::from_parts(self.w * other, self.v * other)
    }
}

impl MulAssign<f32> for Quaternion {
    fn mul_assign(&mut self, other: f32) {
        *self = *self * other;
    }
}

impl Div<f32> for Quaternion {
    type Output = Self;

    fn div(self, other: f32) -> Self::Output {
        Self::from_parts(self.w / other, self.v / other)
    }
}

impl DivAssign<f32> for Quaternion {
    fn div_assign(&mut self, other: f32) {
        *self = *self / other;
    }
}

impl Mul<Quaternion> for f32 {
    type Output = Quaternion;

    fn mul(self, quat: Quaternion) -> Self::Output {
        quat * self
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product. Noncommutative; composes rotations.
    fn mul(self, other: Self) -> Self::Output {
        Self::from_parts(
            self.w*other.w - self.v.dot(other.v),
            other.v*self.w + self.v*other.w + self.v.cross(other.v),
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Div for Quaternion {
    type Output = Self;

    /// Multiplication by the inverse of `other`. Undefined for a zero
    /// `other` (NaN components).
    fn div(self, other: Self) -> Self::Output {
        self * other.inverse()
    }
}

impl DivAssign for Quaternion {
    fn div_assign(&mut self, other: Self) {
        *self = *self / other;
    }
}

impl Mul for Vec3 {
    type Output = Quaternion;

    /// Product of two vectors lifted into quaternion space: both
    /// operands become pure quaternions and the Hamilton product is
    /// returned, `w = −a·b`, `v = a×b`.
    fn mul(self, other: Vec3) -> Self::Output {
        Quaternion::from(self) * Quaternion::from(other)
    }
}

impl From<Vec3> for Quaternion {
    /// Pure quaternion lift, w = 0.
    fn from(v: Vec3) -> Quaternion {
        Quaternion::from_parts(0.0, v)
    }
}

impl From<[f32; 4]> for Quaternion {
    fn from(arr: [f32; 4]) -> Quaternion {
        Quaternion::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Quaternion> for [f32; 4] {
    fn from(quat: Quaternion) -> [f32; 4] {
        [quat.w, quat.v.x, quat.v.y, quat.v.z]
    }
}

impl TryFrom<&[f32]> for Quaternion {
    type Error = AttitudeError;

    /// Reads the first four elements as w, x, y, z. Fails if the slice
    /// holds fewer than four.
    fn try_from(slice: &[f32]) -> Result<Quaternion, Self::Error> {
        if slice.len() < 4 {
            return Err(AttitudeError::SliceTooShort(4, slice.len()));
        }
        Ok(Quaternion::new(slice[0], slice[1], slice[2], slice[3]))
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(w: {}, v: {})", self.w, self.v)
    }
}


#[cfg(test)]
fn quat_close(a: Quaternion, b: Quaternion) -> bool {
    (a - b).len() < 1e-4
}

#[cfg(test)]
fn vec_close(a: Vec3, b: Vec3) -> bool {
    (a - b).len() < 1e-4
}

#[test]
fn identity_product() {
    let id = Quaternion::new(1.0, 0.0, 0.0, 0.0);
    assert!(id * id == id);

    let q = Quaternion::new(0.5, -1.0, 2.0, 4.0);
    assert!(id * q == q);
    assert!(q * id == q);
}

#[test]
fn default_is_identity() {
    assert!(Quaternion::default() == Quaternion::identity());
    assert!(Quaternion::identity() == Quaternion::new(1.0, 0.0, 0.0, 0.0));
}

#[test]
fn hamilton_product() {
    let q1 = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    let q2 = Quaternion::new(5.0, 6.0, 7.0, 8.0);

    assert!(q1 * q2 == Quaternion::new(-60.0, 12.0, 30.0, 24.0));
    assert!(q2 * q1 == Quaternion::new(-60.0, 20.0, 14.0, 32.0));
}

#[test]
fn product_is_associative() {
    let mut rand = crate::random::Randf32::seed(98765);

    for _ in 0..20 {
        let p = rand.quat_in(-1.0..1.0);
        let q = rand.quat_in(-1.0..1.0);
        let r = rand.quat_in(-1.0..1.0);

        assert!(quat_close((p * q) * r, p * (q * r)));
    }
}

#[test]
fn conj_involution() {
    let q = Quaternion::new(0.5, -1.0, 2.0, 4.0);

    assert!(q.conj() == Quaternion::new(0.5, 1.0, -2.0, -4.0));
    assert!(q.conj().conj() == q);
}

#[test]
fn inner_and_len() {
    let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);

    assert!(q.inner() == 30.0);
    assert!((q.len() - 30.0_f32.sqrt()).abs() < 1e-6);
    assert!(q.dot(q) == q.inner());
}

#[test]
fn normalize() {
    let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    assert!((q.normalized().len() - 1.0).abs() < 1e-6);
}

#[test]
fn normalize_zero_is_identity() {
    let q = Quaternion::new(0.0, 0.0, 0.0, 0.0);
    assert!(q.normalized() == Quaternion::identity());
}

#[test]
fn inverse() {
    let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
    assert!(quat_close(q * q.inverse(), Quaternion::identity()));
    assert!(quat_close(q.inverse() * q, Quaternion::identity()));

    // for a unit quaternion the inverse is the conjugate
    let u = q.normalized();
    assert!(quat_close(u.inverse(), u.conj()));
}

#[test]
fn division() {
    let p = Quaternion::new(0.5, -1.0, 2.0, 4.0);
    let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);

    assert!(quat_close((p * q) / q, p));
    assert!(quat_close(q / q, Quaternion::identity()));

    let mut r = p;
    r *= q;
    r /= q;
    assert!(quat_close(r, p));
}

#[test]
fn add_sub_neg() {
    let mut p = Quaternion::new(1.0, -2.0, 4.0, 0.5);
    let q = Quaternion::new(0.5, 3.0, -1.0, 1.5);

    assert!(p + q == Quaternion::new(1.5, 1.0, 3.0, 2.0));
    assert!(p - q == Quaternion::new(0.5, -5.0, 5.0, -1.0));
    assert!(-p == Quaternion::new(-1.0, 2.0, -4.0, -0.5));

    p += q;
    assert!(p == Quaternion::new(1.5, 1.0, 3.0, 2.0));
    p -= q;
    assert!(p == Quaternion::new(1.0, -2.0, 4.0, 0.5));
}

#[test]
fn scalar_ops() {
    let mut q = Quaternion::new(1.0, -2.0, 4.0, 0.5);

    assert!(q * 2.0 == Quaternion::new(2.0, -4.0, 8.0, 1.0));
    assert!(2.0 * q == q * 2.0);
    assert!(q / 2.0 == Quaternion::new(0.5, -1.0, 2.0, 0.25));

    q *= 2.0;
    assert!(q == Quaternion::new(2.0, -4.0, 8.0, 1.0));
    q /= 2.0;
    assert!(q == Quaternion::new(1.0, -2.0, 4.0, 0.5));
}

#[test]
fn pure_lift() {
    let q = Quaternion::from(Vec3::new(1.0, 2.0, 3.0));
    assert!(q == Quaternion::new(0.0, 1.0, 2.0, 3.0));
}

#[test]
fn vector_product_lifts_to_quaternion() {
    let x = Vec3::new(1.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 1.0, 0.0);
    assert!(x * y == Quaternion::new(0.0, 0.0, 0.0, 1.0));

    let a = Vec3::new(0.4, -2.0, 1.1);
    let b = Vec3::new(3.0, 0.7, -0.2);
    assert!(quat_close(a * b, Quaternion::from_parts(-a.dot(b), a.cross(b))));
}

#[test]
fn unit_rotation_invariant() {
    let mut rand = crate::random::Randf32::seed(24680);

    for _ in 0..20 {
        let axis = rand.vec3_in(-5.0..5.0);
        let angle = rand.next_in(-6.0..6.0);
        if axis.len() == 0.0 {
            continue;
        }
        assert!((Quaternion::from_axis_angle(Frame::Global, axis, angle).len() - 1.0).abs() < 1e-5);
        assert!((Quaternion::from_axis_angle(Frame::Local, axis, angle).len() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn identity_rotation() {
    let q = Quaternion::from_axis_angle(Frame::Global, Vec3::new(1.0, 2.0, 3.0), 0.0);
    assert!(q == Quaternion::identity());

    let p = Vec3::new(0.3, -1.0, 0.25);
    assert!(q.rotate(Frame::Global, p) == p);
    assert!(q.rotate(Frame::Local, p) == p);
}

#[test]
fn rotation_anchor_90_deg_about_z() {
    let q = Quaternion::from_axis_angle(
        Frame::Global,
        Vec3::new(0.0, 0.0, 1.0),
        std::f32::consts::FRAC_PI_2,
    );
    let x = Vec3::new(1.0, 0.0, 0.0);

    assert!(vec_close(q.rotate(Frame::Global, x), Vec3::new(0.0, 1.0, 0.0)));
    assert!(vec_close(q.rotate(Frame::Local, x), Vec3::new(0.0, -1.0, 0.0)));
}

#[test]
fn rotation_round_trip() {
    let mut rand = crate::random::Randf32::seed(13579);

    for _ in 0..20 {
        let q = Quaternion::from_axis_angle(
            Frame::Global,
            rand.vec3_in(-1.0..1.0),
            rand.next_in(-3.0..3.0),
        );
        let p = rand.vec3_in(-10.0..10.0);

        assert!(vec_close(q.rotate(Frame::Local, q.rotate(Frame::Global, p)), p));
    }
}

#[test]
fn frames_are_conjugate() {
    let axis = Vec3::new(1.0, -2.0, 0.5);
    let angle = 1.1;

    let global = Quaternion::from_axis_angle(Frame::Global, axis, angle);
    let local = Quaternion::from_axis_angle(Frame::Local, axis, angle);
    assert!(local == global.conj());

    // same frame at both ends gives the same right-hand rotation
    let p = Vec3::new(0.0, 3.0, -1.0);
    assert!(vec_close(
        global.rotate(Frame::Global, p),
        local.rotate(Frame::Local, p),
    ));
}

#[test]
fn rotation_vector_form() {
    let q = Quaternion::from_rotation(
        Frame::Global,
        Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
    );
    let x = Vec3::new(1.0, 0.0, 0.0);
    assert!(vec_close(q.rotate(Frame::Global, x), Vec3::new(0.0, 1.0, 0.0)));

    assert!(Quaternion::from_rotation(Frame::Global, Vec3::zero()) == Quaternion::identity());
}

#[test]
fn set_in_place() {
    let axis = Vec3::new(0.3, 0.1, -2.0);

    let mut q = Quaternion::default();
    q.set_axis_angle(Frame::Global, axis, 0.8);
    assert!(q == Quaternion::from_axis_angle(Frame::Global, axis, 0.8));

    q.set_rotation(Frame::Local, axis);
    assert!(q == Quaternion::from_rotation(Frame::Local, axis));
}

#[test]
fn axis_projections() {
    let q = Quaternion::from_axis_angle(
        Frame::Global,
        Vec3::new(0.0, 0.0, 1.0),
        std::f32::consts::FRAC_PI_2,
    );

    assert!(vec_close(q.axis_x(Frame::Global), Vec3::new(0.0, 1.0, 0.0)));
    assert!(vec_close(q.axis_y(Frame::Global), Vec3::new(-1.0, 0.0, 0.0)));
    assert!(vec_close(q.axis_z(Frame::Global), Vec3::new(0.0, 0.0, 1.0)));
    assert!(vec_close(q.axis_x(Frame::Local), Vec3::new(0.0, -1.0, 0.0)));
}

#[test]
fn array_conversions() {
    let q = Quaternion::from([1.0, 2.0, 3.0, 4.0]);
    assert!(q == Quaternion::new(1.0, 2.0, 3.0, 4.0));

    let arr: [f32; 4] = q.into();
    assert!(arr == [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn try_from_slice() {
    let q = Quaternion::try_from(&[1.0, 2.0, 3.0, 4.0, 9.0][..]).unwrap();
    assert!(q == Quaternion::new(1.0, 2.0, 3.0, 4.0));

    assert!(Quaternion::try_from(&[1.0, 2.0, 3.0][..]).is_err());
}

#[test]
fn pod_cast() {
    let q = Quaternion::new(0.5, -1.0, 0.25, 8.0);
    let bytes = bytemuck::bytes_of(&q);
    assert!(bytes.len() == 16);
    assert!(*bytemuck::from_bytes::<Quaternion>(bytes) == q);
}

#[test]
fn cgmath_product_oracle() {
    let p = Quaternion::new(0.3, -0.8, 0.44, 1.2);
    let q = Quaternion::new(-0.9, 0.1, 2.0, -0.5);
    let cp = cgmath::Quaternion::new(0.3, -0.8, 0.44, 1.2);
    let cq = cgmath::Quaternion::new(-0.9, 0.1, 2.0, -0.5);

    let r = p * q;
    let cr = cp * cq;
    assert!((r.w - cr.s).abs() < 1e-5);
    assert!((r.v.x - cr.v.x).abs() < 1e-5);
    assert!((r.v.y - cr.v.y).abs() < 1e-5);
    assert!((r.v.z - cr.v.z).abs() < 1e-5);
}

#[test]
fn cgmath_rotation_oracle() {
    use cgmath::InnerSpace;
    use cgmath::Rotation3;

    let q = Quaternion::from_axis_angle(Frame::Global, Vec3::new(1.0, 2.0, -0.5), 0.7);
    let cq = cgmath::Quaternion::from_axis_angle(
        cgmath::Vector3::new(1.0f32, 2.0, -0.5).normalize(),
        cgmath::Rad(0.7f32),
    );

    assert!((q.w - cq.s).abs() < 1e-5);
    assert!((q.v.x - cq.v.x).abs() < 1e-5);
    assert!((q.v.y - cq.v.y).abs() < 1e-5);
    assert!((q.v.z - cq.v.z).abs() < 1e-5);

    let r = q.rotate(Frame::Global, Vec3::new(0.3, -1.0, 0.25));
    let cr = cq * cgmath::Vector3::new(0.3f32, -1.0, 0.25);
    assert!((r.x - cr.x).abs() < 1e-5);
    assert!((r.y - cr.y).abs() < 1e-5);
    assert!((r.z - cr.z).abs() < 1e-5);
}
