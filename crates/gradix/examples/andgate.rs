//! Trains a single relu unit to behave as an AND gate with per-parameter
//! gradient-descent updates.

use gradix::prelude::*;

fn main() {
    let w = Value::new(Matrix::<1, 2>::ones());
    let b = Value::new(0.0f32);

    let samples: [[f32; 3]; 4] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 1.0],
    ];

    let lr = 0.5;

    for _ in 0..100 {
        for [x0, x1, y] in samples {
            let x = Vector::new([x0, x1]);

            let y_est = (&w * x + &b).relu();
            let loss = (&y_est - y).powf(2.0) * 0.5;
            loss.backward().unwrap();

            w.update(lr).unwrap();
            b.update(lr).unwrap();
        }
    }

    println!("w = {} b = {}", w.value(), b.value());

    for [x0, x1, y] in samples {
        let x = Vector::new([x0, x1]);
        let y_est = (&w * x + &b).relu();
        println!("{} AND {} -> {:.3} (expected {})", x0, x1, y_est.value()[0], y);
    }
}
