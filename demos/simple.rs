//! Reading and writing values in text form.
//!
//! Run with: cargo run --example simple

use futhark_data::{from_str, load_str, to_string, Value};
use ndarray::arr2;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let matrix = Value::from(arr2(&[[1.5f32, -2.0], [0.25, 8.0]]).into_dyn());

    // Encode as text
    let text = to_string(&matrix);
    println!("Text output:\n{}\n", text);

    // Decode it back
    let back = from_str(&text)?;
    assert_eq!(back, matrix);
    println!("✓ Round-trip successful");

    // A stream holding several values, with comments
    let input = "-- inputs\n3i64\n[true, false]\nempty([0][2]u8)\n";
    for value in load_str(input) {
        let value = value?;
        println!(
            "{} of type {} and shape {:?}",
            value,
            value.primitive_type(),
            value.shape()
        );
    }

    Ok(())
}
