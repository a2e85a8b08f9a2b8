//! Operator Overloads - The Binary Operation Surface
//!
//! Every binary operation accepts each operand as a handle (owned or
//! borrowed) or as a raw shape value; raw operands are lifted into constant
//! leaves owned by the resulting node. All combinations funnel into one
//! generic constructor per operation, and the set of supported shape
//! pairings is exactly the set for which the trait bounds hold, so an
//! unsupported pairing does not compile. Handles cannot nest: `Value<T>`
//! requires `T: Tensor`, which no handle implements.
//!
//! @version 0.1.0
//! @author Gradix Development Team

use core::ops::{Add, Div, Mul, Neg, Sub};

use gradix_tensor::{BroadcastTo, Matrix, ReduceTo, Tensor, Vector};

use crate::functions::{AddBackward, DivBackward, MulBackward, NegBackward, SubBackward};
use crate::grad_fn::{GradFn, ProductGrad};
use crate::value::Value;

// =============================================================================
// Generic Constructors
// =============================================================================

pub(crate) fn add_values<A, B, S>(lhs: &Value<A>, rhs: &Value<B>) -> Value<S>
where
    A: Tensor + Add<B, Output = S>,
    B: Tensor,
    S: Tensor + ReduceTo<A> + ReduceTo<B>,
{
    let value = lhs.value() + rhs.value();
    let requires_grad = lhs.requires_grad() || rhs.requires_grad();
    Value::from_op(
        value,
        GradFn::new(AddBackward::new(lhs.clone(), rhs.clone())),
        requires_grad,
    )
}

pub(crate) fn sub_values<A, B, S>(lhs: &Value<A>, rhs: &Value<B>) -> Value<S>
where
    A: Tensor + Sub<B, Output = S>,
    B: Tensor,
    S: Tensor + ReduceTo<A> + ReduceTo<B>,
{
    let value = lhs.value() - rhs.value();
    let requires_grad = lhs.requires_grad() || rhs.requires_grad();
    Value::from_op(
        value,
        GradFn::new(SubBackward::new(lhs.clone(), rhs.clone())),
        requires_grad,
    )
}

pub(crate) fn mul_values<A, B, S>(lhs: &Value<A>, rhs: &Value<B>) -> Value<S>
where
    A: Tensor + Mul<B, Output = S> + ProductGrad<B, S>,
    B: Tensor + ProductGrad<A, S>,
    S: Tensor,
{
    let value = lhs.value() * rhs.value();
    let requires_grad = lhs.requires_grad() || rhs.requires_grad();
    Value::from_op(
        value,
        GradFn::new(MulBackward::new(lhs.clone(), rhs.clone())),
        requires_grad,
    )
}

pub(crate) fn div_values<A, B, S>(lhs: &Value<A>, rhs: &Value<B>) -> Value<S>
where
    A: Tensor + Div<B, Output = S> + BroadcastTo<S>,
    B: Tensor + BroadcastTo<S>,
    S: Tensor + ReduceTo<A> + ReduceTo<B>,
{
    let value = lhs.value() / rhs.value();
    let requires_grad = lhs.requires_grad() || rhs.requires_grad();
    Value::from_op(
        value,
        GradFn::new(DivBackward::new(lhs.clone(), rhs.clone())),
        requires_grad,
    )
}

pub(crate) fn neg_value<T: Tensor>(input: &Value<T>) -> Value<T> {
    Value::from_op(
        -input.value(),
        GradFn::new(NegBackward::new(input.clone())),
        input.requires_grad(),
    )
}

// =============================================================================
// Overload Expansion Macros
// =============================================================================

/// Expands the four ownership combinations of one operator between two
/// handles.
macro_rules! impl_handle_op {
    ($op_trait:ident, $op_method:ident, $ctor:ident, [$($bound:tt)*]) => {
        impl<'a, 'b, A, B> $op_trait<&'b Value<B>> for &'a Value<A>
        where
            A: Tensor + $op_trait<B>,
            B: Tensor,
            <A as $op_trait<B>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<A as $op_trait<B>>::Output>;

            fn $op_method(self, rhs: &'b Value<B>) -> Self::Output {
                $ctor(self, rhs)
            }
        }

        impl<'a, A, B> $op_trait<Value<B>> for &'a Value<A>
        where
            A: Tensor + $op_trait<B>,
            B: Tensor,
            <A as $op_trait<B>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<A as $op_trait<B>>::Output>;

            fn $op_method(self, rhs: Value<B>) -> Self::Output {
                $ctor(self, &rhs)
            }
        }

        impl<'b, A, B> $op_trait<&'b Value<B>> for Value<A>
        where
            A: Tensor + $op_trait<B>,
            B: Tensor,
            <A as $op_trait<B>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<A as $op_trait<B>>::Output>;

            fn $op_method(self, rhs: &'b Value<B>) -> Self::Output {
                $ctor(&self, rhs)
            }
        }

        impl<A, B> $op_trait<Value<B>> for Value<A>
        where
            A: Tensor + $op_trait<B>,
            B: Tensor,
            <A as $op_trait<B>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<A as $op_trait<B>>::Output>;

            fn $op_method(self, rhs: Value<B>) -> Self::Output {
                $ctor(&self, &rhs)
            }
        }
    };
}

/// Expands one operator taking a raw shape value on the right; the raw
/// operand is lifted into a constant leaf.
macro_rules! impl_raw_rhs_op {
    ($op_trait:ident, $op_method:ident, $ctor:ident, [$($gen:tt)*], $raw:ty, [$($bound:tt)*]) => {
        impl<'a, A, $($gen)*> $op_trait<$raw> for &'a Value<A>
        where
            A: Tensor + $op_trait<$raw>,
            <A as $op_trait<$raw>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<A as $op_trait<$raw>>::Output>;

            fn $op_method(self, rhs: $raw) -> Self::Output {
                $ctor(self, &Value::constant(rhs))
            }
        }

        impl<A, $($gen)*> $op_trait<$raw> for Value<A>
        where
            A: Tensor + $op_trait<$raw>,
            <A as $op_trait<$raw>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<A as $op_trait<$raw>>::Output>;

            fn $op_method(self, rhs: $raw) -> Self::Output {
                $ctor(&self, &Value::constant(rhs))
            }
        }
    };
}

/// Expands one operator taking a raw shape value on the left.
macro_rules! impl_raw_lhs_op {
    ($op_trait:ident, $op_method:ident, $ctor:ident, [$($gen:tt)*], $raw:ty, [$($bound:tt)*]) => {
        impl<'b, B, $($gen)*> $op_trait<&'b Value<B>> for $raw
        where
            B: Tensor,
            $raw: Tensor + $op_trait<B>,
            <$raw as $op_trait<B>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<$raw as $op_trait<B>>::Output>;

            fn $op_method(self, rhs: &'b Value<B>) -> Self::Output {
                $ctor(&Value::constant(self), rhs)
            }
        }

        impl<B, $($gen)*> $op_trait<Value<B>> for $raw
        where
            B: Tensor,
            $raw: Tensor + $op_trait<B>,
            <$raw as $op_trait<B>>::Output: Tensor,
            $($bound)*
        {
            type Output = Value<<$raw as $op_trait<B>>::Output>;

            fn $op_method(self, rhs: Value<B>) -> Self::Output {
                $ctor(&Value::constant(self), &rhs)
            }
        }
    };
}

// =============================================================================
// Handle / Handle Forms
// =============================================================================

impl_handle_op!(Add, add, add_values, [
    <A as Add<B>>::Output: ReduceTo<A> + ReduceTo<B>
]);
impl_handle_op!(Sub, sub, sub_values, [
    <A as Sub<B>>::Output: ReduceTo<A> + ReduceTo<B>
]);
impl_handle_op!(Mul, mul, mul_values, [
    A: ProductGrad<B, <A as Mul<B>>::Output>,
    B: ProductGrad<A, <A as Mul<B>>::Output>
]);
impl_handle_op!(Div, div, div_values, [
    A: BroadcastTo<<A as Div<B>>::Output>,
    B: BroadcastTo<<A as Div<B>>::Output>,
    <A as Div<B>>::Output: ReduceTo<A> + ReduceTo<B>
]);

// =============================================================================
// Raw Operand Forms
// =============================================================================

impl_raw_rhs_op!(Add, add, add_values, [], f32, [
    <A as Add<f32>>::Output: ReduceTo<A> + ReduceTo<f32>
]);
impl_raw_rhs_op!(Add, add, add_values, [const N: usize], Vector<N>, [
    <A as Add<Vector<N>>>::Output: ReduceTo<A> + ReduceTo<Vector<N>>
]);
impl_raw_rhs_op!(Add, add, add_values, [const R: usize, const C: usize], Matrix<R, C>, [
    <A as Add<Matrix<R, C>>>::Output: ReduceTo<A> + ReduceTo<Matrix<R, C>>
]);
impl_raw_lhs_op!(Add, add, add_values, [], f32, [
    <f32 as Add<B>>::Output: ReduceTo<f32> + ReduceTo<B>
]);
impl_raw_lhs_op!(Add, add, add_values, [const N: usize], Vector<N>, [
    <Vector<N> as Add<B>>::Output: ReduceTo<Vector<N>> + ReduceTo<B>
]);
impl_raw_lhs_op!(Add, add, add_values, [const R: usize, const C: usize], Matrix<R, C>, [
    <Matrix<R, C> as Add<B>>::Output: ReduceTo<Matrix<R, C>> + ReduceTo<B>
]);

impl_raw_rhs_op!(Sub, sub, sub_values, [], f32, [
    <A as Sub<f32>>::Output: ReduceTo<A> + ReduceTo<f32>
]);
impl_raw_rhs_op!(Sub, sub, sub_values, [const N: usize], Vector<N>, [
    <A as Sub<Vector<N>>>::Output: ReduceTo<A> + ReduceTo<Vector<N>>
]);
impl_raw_rhs_op!(Sub, sub, sub_values, [const R: usize, const C: usize], Matrix<R, C>, [
    <A as Sub<Matrix<R, C>>>::Output: ReduceTo<A> + ReduceTo<Matrix<R, C>>
]);
impl_raw_lhs_op!(Sub, sub, sub_values, [], f32, [
    <f32 as Sub<B>>::Output: ReduceTo<f32> + ReduceTo<B>
]);
impl_raw_lhs_op!(Sub, sub, sub_values, [const N: usize], Vector<N>, [
    <Vector<N> as Sub<B>>::Output: ReduceTo<Vector<N>> + ReduceTo<B>
]);
impl_raw_lhs_op!(Sub, sub, sub_values, [const R: usize, const C: usize], Matrix<R, C>, [
    <Matrix<R, C> as Sub<B>>::Output: ReduceTo<Matrix<R, C>> + ReduceTo<B>
]);

impl_raw_rhs_op!(Mul, mul, mul_values, [], f32, [
    A: ProductGrad<f32, <A as Mul<f32>>::Output>,
    f32: ProductGrad<A, <A as Mul<f32>>::Output>
]);
impl_raw_rhs_op!(Mul, mul, mul_values, [const N: usize], Vector<N>, [
    A: ProductGrad<Vector<N>, <A as Mul<Vector<N>>>::Output>,
    Vector<N>: ProductGrad<A, <A as Mul<Vector<N>>>::Output>
]);
impl_raw_rhs_op!(Mul, mul, mul_values, [const R: usize, const C: usize], Matrix<R, C>, [
    A: ProductGrad<Matrix<R, C>, <A as Mul<Matrix<R, C>>>::Output>,
    Matrix<R, C>: ProductGrad<A, <A as Mul<Matrix<R, C>>>::Output>
]);
impl_raw_lhs_op!(Mul, mul, mul_values, [], f32, [
    f32: ProductGrad<B, <f32 as Mul<B>>::Output>,
    B: ProductGrad<f32, <f32 as Mul<B>>::Output>
]);
impl_raw_lhs_op!(Mul, mul, mul_values, [const N: usize], Vector<N>, [
    Vector<N>: ProductGrad<B, <Vector<N> as Mul<B>>::Output>,
    B: ProductGrad<Vector<N>, <Vector<N> as Mul<B>>::Output>
]);
impl_raw_lhs_op!(Mul, mul, mul_values, [const R: usize, const C: usize], Matrix<R, C>, [
    Matrix<R, C>: ProductGrad<B, <Matrix<R, C> as Mul<B>>::Output>,
    B: ProductGrad<Matrix<R, C>, <Matrix<R, C> as Mul<B>>::Output>
]);

impl_raw_rhs_op!(Div, div, div_values, [], f32, [
    A: BroadcastTo<<A as Div<f32>>::Output>,
    f32: BroadcastTo<<A as Div<f32>>::Output>,
    <A as Div<f32>>::Output: ReduceTo<A> + ReduceTo<f32>
]);
impl_raw_rhs_op!(Div, div, div_values, [const N: usize], Vector<N>, [
    A: BroadcastTo<<A as Div<Vector<N>>>::Output>,
    Vector<N>: BroadcastTo<<A as Div<Vector<N>>>::Output>,
    <A as Div<Vector<N>>>::Output: ReduceTo<A> + ReduceTo<Vector<N>>
]);
impl_raw_rhs_op!(Div, div, div_values, [const R: usize, const C: usize], Matrix<R, C>, [
    A: BroadcastTo<<A as Div<Matrix<R, C>>>::Output>,
    Matrix<R, C>: BroadcastTo<<A as Div<Matrix<R, C>>>::Output>,
    <A as Div<Matrix<R, C>>>::Output: ReduceTo<A> + ReduceTo<Matrix<R, C>>
]);
impl_raw_lhs_op!(Div, div, div_values, [], f32, [
    f32: BroadcastTo<<f32 as Div<B>>::Output>,
    B: BroadcastTo<<f32 as Div<B>>::Output>,
    <f32 as Div<B>>::Output: ReduceTo<f32> + ReduceTo<B>
]);
impl_raw_lhs_op!(Div, div, div_values, [const N: usize], Vector<N>, [
    Vector<N>: BroadcastTo<<Vector<N> as Div<B>>::Output>,
    B: BroadcastTo<<Vector<N> as Div<B>>::Output>,
    <Vector<N> as Div<B>>::Output: ReduceTo<Vector<N>> + ReduceTo<B>
]);
impl_raw_lhs_op!(Div, div, div_values, [const R: usize, const C: usize], Matrix<R, C>, [
    Matrix<R, C>: BroadcastTo<<Matrix<R, C> as Div<B>>::Output>,
    B: BroadcastTo<<Matrix<R, C> as Div<B>>::Output>,
    <Matrix<R, C> as Div<B>>::Output: ReduceTo<Matrix<R, C>> + ReduceTo<B>
]);

// =============================================================================
// Negation
// =============================================================================

impl<'a, T: Tensor> Neg for &'a Value<T> {
    type Output = Value<T>;

    fn neg(self) -> Value<T> {
        neg_value(self)
    }
}

impl<T: Tensor> Neg for Value<T> {
    type Output = Value<T>;

    fn neg(self) -> Value<T> {
        neg_value(&self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_handle_combinations() {
        let a = Value::new(2.0f32);
        let b = Value::new(3.0f32);
        assert_eq!((&a + &b).value(), 5.0);
        assert_eq!((&a + b.clone()).value(), 5.0);
        assert_eq!((a.clone() + &b).value(), 5.0);
        assert_eq!((a.clone() + b.clone()).value(), 5.0);
    }

    #[test]
    fn test_raw_operands_are_lifted() {
        let a = Value::new(2.0f32);
        let sum = &a + 3.0;
        assert_eq!(sum.value(), 5.0);
        // The lifted operand is a constant leaf, so the result still
        // requires gradients only through `a`.
        assert!(sum.requires_grad());

        let sum = 3.0 + &a;
        assert_eq!(sum.value(), 5.0);
    }

    #[test]
    fn test_raw_and_handle_forms_agree() {
        let a = Value::new(2.0f32);
        let via_raw = (&a * 3.0).value();
        let via_handle = (&a * &Value::constant(3.0)).value();
        assert_eq!(via_raw, via_handle);
    }

    #[test]
    fn test_scalar_vector_combinations() {
        let s = Value::new(2.0f32);
        let v = Value::new(Vector::new([1.0, 2.0, 3.0]));

        assert_eq!((&s + &v).value().to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!((&v + &s).value().to_vec(), vec![3.0, 4.0, 5.0]);
        assert_eq!((&s * &v).value().to_vec(), vec![2.0, 4.0, 6.0]);
        assert_eq!((&v / &s).value().to_vec(), vec![0.5, 1.0, 1.5]);
        assert_eq!((&v - 1.0).value().to_vec(), vec![0.0, 1.0, 2.0]);
        assert_eq!((1.0 - &v).value().to_vec(), vec![0.0, -1.0, -2.0]);
    }

    #[test]
    fn test_matvec_product() {
        let m = Value::new(Matrix::new([[1.0, 2.0], [3.0, 4.0]]));
        let v = Value::new(Vector::new([1.0, 1.0]));
        let y = &m * &v;
        assert_eq!(y.value().to_vec(), vec![3.0, 7.0]);

        let y = &m * Vector::new([1.0, 0.0]);
        assert_eq!(y.value().to_vec(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_negation() {
        let v = Value::new(Vector::new([1.0, -2.0]));
        assert_eq!((-&v).value().to_vec(), vec![-1.0, 2.0]);
        let owned = -Value::new(3.0f32);
        assert_eq!(owned.value(), -3.0);
    }

    #[test]
    fn test_division_combinations() {
        let m = Value::new(Matrix::new([[2.0, 4.0], [8.0, 16.0]]));
        let halved = &m / 2.0;
        assert_eq!(halved.value().to_vec(), vec![1.0, 2.0, 4.0, 8.0]);
        let inverted = 16.0 / &m;
        assert_eq!(inverted.value().to_vec(), vec![8.0, 4.0, 2.0, 1.0]);
    }
}
