//! The canonical scalar backprop example: a relu over a scaled, shifted
//! input, differentiated back to the leaf.

use gradix::prelude::*;

fn main() {
    let x = Value::new(-3.0f32);

    let y = (-&x * 3.0 + 2.0).relu();
    y.backward().unwrap();

    println!("y    = {}", y);
    println!("y()  = {}", y.value());
    println!("dy/dx = {}", x.grad().unwrap());
}
