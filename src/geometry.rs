//! Geometric utility objects.

use crate::num::BFloat;
use std::{
    fmt,
    ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

#[cfg(feature = "for-testing")]
use approx::{AbsDiffEq, RelativeEq};

/// Denotes the x-, y- or z-dimension.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Dim3 {
    /// Creates an array for iterating over the x-, y- and z-dimensions.
    pub fn slice() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

use Dim3::{X, Y, Z};

/// Represents any quantity with three dimensional components.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct In3D<T>([T; 3]);

impl<T> In3D<T> {
    /// Creates a new 3D quantity given the three components.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self([x, y, z])
    }

    /// Creates a new 3D quantity by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> T,
    {
        Self::new(
            create_component(X),
            create_component(Y),
            create_component(Z),
        )
    }

    /// Creates a new tuple containing copies of the three components.
    pub fn to_tuple(&self) -> (T, T, T)
    where
        T: Copy,
    {
        (self[X], self[Y], self[Z])
    }
}

impl<T> Index<Dim3> for In3D<T> {
    type Output = T;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim3> for In3D<T> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<T: fmt::Display> fmt::Display for In3D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str("]")
    }
}

#[cfg(feature = "for-testing")]
impl<T> AbsDiffEq for In3D<T>
where
    T: AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = <T as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        T::abs_diff_eq(&self[X], &other[X], epsilon)
            && T::abs_diff_eq(&self[Y], &other[Y], epsilon)
            && T::abs_diff_eq(&self[Z], &other[Z], epsilon)
    }
}

#[cfg(feature = "for-testing")]
impl<T> RelativeEq for In3D<T>
where
    T: RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        T::relative_eq(&self[X], &other[X], epsilon, max_relative)
            && T::relative_eq(&self[Y], &other[Y], epsilon, max_relative)
            && T::relative_eq(&self[Z], &other[Z], epsilon, max_relative)
    }
}

#[cfg(feature = "for-testing")]
macro_rules! impl_approx_eq_3d {
    ($T:ident <$F:ident>) => {
        impl<$F> AbsDiffEq for $T<$F>
        where
            $F: BFloat + AbsDiffEq,
            $F::Epsilon: Copy,
        {
            type Epsilon = <In3D<$F> as AbsDiffEq>::Epsilon;

            fn default_epsilon() -> Self::Epsilon {
                In3D::<$F>::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
                In3D::<$F>::abs_diff_eq(&self.0, &other.0, epsilon)
            }
        }

        impl<$F> RelativeEq for $T<$F>
        where
            $F: BFloat + RelativeEq,
            $F::Epsilon: Copy,
        {
            fn default_max_relative() -> Self::Epsilon {
                In3D::<$F>::default_max_relative()
            }

            fn relative_eq(
                &self,
                other: &Self,
                epsilon: Self::Epsilon,
                max_relative: Self::Epsilon,
            ) -> bool {
                In3D::<$F>::relative_eq(&self.0, &other.0, epsilon, max_relative)
            }
        }
    };
}

/// A 3D vector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec3<F>(In3D<F>);

impl<F: BFloat> Vec3<F> {
    /// Creates a new 3D vector given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self(In3D::new(x, y, z))
    }

    /// Creates a new 3D vector by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim3) -> F,
    {
        Self(In3D::with_each_component(create_component))
    }

    /// Creates a new zero vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Creates a new vector with all component equal to the given value.
    pub fn equal_components(a: F) -> Self {
        Self::new(a, a, a)
    }

    /// Computes the squared length of the vector.
    pub fn squared_length(&self) -> F {
        self[X] * self[X] + self[Y] * self[Y] + self[Z] * self[Z]
    }

    /// Computes the length of the vector.
    pub fn length(&self) -> F {
        self.squared_length().sqrt()
    }

    /// Whether the vector is the zero vector.
    pub fn is_zero(&self) -> bool {
        self[X] == F::zero() && self[Y] == F::zero() && self[Z] == F::zero()
    }

    /// Whether all components are finite.
    pub fn is_finite(&self) -> bool {
        self[X].is_finite() && self[Y].is_finite() && self[Z].is_finite()
    }

    /// Computes the dot product of the vector with another vector.
    pub fn dot(&self, other: &Self) -> F {
        self[X] * other[X] + self[Y] * other[Y] + self[Z] * other[Z]
    }

    /// Computes the cross product of the vector with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self[Y] * other[Z] - self[Z] * other[Y],
            self[Z] * other[X] - self[X] * other[Z],
            self[X] * other[Y] - self[Y] * other[X],
        )
    }

    /// Returns the unit vector with the same direction, or `None`
    /// if the vector has zero or non-finite length.
    pub fn normalized(&self) -> Option<Self> {
        let length = self.length();
        if length == F::zero() || !length.is_finite() {
            None
        } else {
            Some(self / length)
        }
    }
}

impl<F: BFloat> Index<Dim3> for Vec3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Vec3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self[X] + other[X], self[Y] + other[Y], self[Z] + other[Z])
    }
}

impl<F: BFloat> Add<Vec3<F>> for &Vec3<F> {
    type Output = Vec3<F>;
    fn add(self, other: Vec3<F>) -> Self::Output {
        self + &other
    }
}

impl<F: BFloat> Add<Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<F: BFloat> Add<&Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn add(self, other: &Self) -> Self::Output {
        &self + other
    }
}

impl<'a, F: BFloat> Sub<&'a Vec3<F>> for &'a Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self[X] - other[X], self[Y] - other[Y], self[Z] - other[Z])
    }
}

impl<F: BFloat> Sub<Vec3<F>> for &Vec3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Vec3<F>) -> Self::Output {
        self - &other
    }
}

impl<F: BFloat> Sub<Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Sub<&Vec3<F>> for Vec3<F> {
    type Output = Self;
    fn sub(self, other: &Self) -> Self::Output {
        &self - other
    }
}

impl<F: BFloat> Mul<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn mul(self, factor: F) -> Self::Output {
        Self::Output::new(factor * self[X], factor * self[Y], factor * self[Z])
    }
}

impl<F: BFloat> Mul<F> for Vec3<F> {
    type Output = Self;
    fn mul(self, factor: F) -> Self::Output {
        &self * factor
    }
}

impl<F: BFloat> Div<F> for &Vec3<F> {
    type Output = Vec3<F>;
    fn div(self, divisor: F) -> Self::Output {
        Self::Output::new(self[X] / divisor, self[Y] / divisor, self[Z] / divisor)
    }
}

impl<F: BFloat> Div<F> for Vec3<F> {
    type Output = Self;
    fn div(self, divisor: F) -> Self::Output {
        &self / divisor
    }
}

impl<F: BFloat> Neg for &Vec3<F> {
    type Output = Vec3<F>;
    fn neg(self) -> Self::Output {
        Self::Output::new(-self[X], -self[Y], -self[Z])
    }
}

impl<F: BFloat> Neg for Vec3<F> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        -&self
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Vec3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str(")")
    }
}

#[cfg(feature = "for-testing")]
impl_approx_eq_3d!(Vec3<F>);

/// A 3D spatial coordinate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Point3<F>(In3D<F>);

impl<F: BFloat> Point3<F> {
    /// Creates a new 3D point given the three components.
    pub fn new(x: F, y: F, z: F) -> Self {
        Self(In3D::new(x, y, z))
    }

    /// Creates a new 3D point with all components set to zero.
    pub fn origin() -> Self {
        Self::new(F::zero(), F::zero(), F::zero())
    }

    /// Constructs a new vector from the point components.
    pub fn to_vec3(&self) -> Vec3<F> {
        Vec3::with_each_component(|dim| self[dim])
    }

    /// Whether all components are finite.
    pub fn is_finite(&self) -> bool {
        self[X].is_finite() && self[Y].is_finite() && self[Z].is_finite()
    }
}

impl<F: BFloat> Index<Dim3> for Point3<F> {
    type Output = F;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim3> for Point3<F> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<'a, F: BFloat> Sub<&'a Point3<F>> for &'a Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self[X] - other[X], self[Y] - other[Y], self[Z] - other[Z])
    }
}

impl<F: BFloat> Sub<Point3<F>> for Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Sub<&Point3<F>> for Point3<F> {
    type Output = Vec3<F>;
    fn sub(self, other: &Self) -> Self::Output {
        &self - other
    }
}

impl<'a, F: BFloat> Add<&'a Vec3<F>> for &'a Point3<F> {
    type Output = Point3<F>;
    fn add(self, vector: &Vec3<F>) -> Self::Output {
        Self::Output::new(
            self[X] + vector[X],
            self[Y] + vector[Y],
            self[Z] + vector[Z],
        )
    }
}

impl<F: BFloat> Add<Vec3<F>> for &Point3<F> {
    type Output = Point3<F>;
    fn add(self, vector: Vec3<F>) -> Self::Output {
        self + &vector
    }
}

impl<F: BFloat> Add<Vec3<F>> for Point3<F> {
    type Output = Self;
    fn add(self, vector: Vec3<F>) -> Self::Output {
        &self + &vector
    }
}

impl<F: BFloat> Add<&Vec3<F>> for Point3<F> {
    type Output = Self;
    fn add(self, vector: &Vec3<F>) -> Self::Output {
        &self + vector
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Point3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt::Display::fmt(&self[X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Y], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Z], f)?;
        f.write_str(")")
    }
}

#[cfg(feature = "for-testing")]
impl_approx_eq_3d!(Point3<F>);
