//! Mixed-shape differentiation: a matrix-vector product with a broadcast
//! add, reduced to a scalar by sum.

use gradix::prelude::*;

fn main() {
    let mat = Value::new(Matrix::<3, 3>::identity());
    let v = Value::new(Vector::new([2.0, 4.0, 6.0]));

    let y = &mat * &v + 2.0;
    let s = y.sum();
    s.backward().unwrap();

    println!("s       = {}", s.value());
    println!("dmat    = {}", mat.grad().unwrap());
    println!("dv      = {}", v.grad().unwrap());
}
