//! Converting between the text and binary forms.
//!
//! Run with: cargo run --example binary_roundtrip

use futhark_data::{load, to_writer, to_writer_with_options, Value, WriteOptions};
use std::error::Error;
use std::io::{BufReader, Cursor};

fn main() -> Result<(), Box<dyn Error>> {
    let text = "[[1, 2, 3], [4, 5, 6]] 0x1.8p1f32 -- two values";

    // Text in, binary out
    let mut binary = Vec::new();
    for value in load(BufReader::new(text.as_bytes())) {
        to_writer(&mut binary, &value?)?;
    }
    println!("Binary size: {} bytes (text was {})", binary.len(), text.len());

    // Binary in, text out
    let mut output = Vec::new();
    let values: Vec<Value> = load(Cursor::new(&binary)).collect::<Result<_, _>>()?;
    for value in &values {
        to_writer_with_options(&mut output, value, WriteOptions::text())?;
        output.push(b'\n');
    }
    print!("{}", String::from_utf8(output)?);

    assert_eq!(values.len(), 2);
    println!("✓ Conversion successful");

    Ok(())
}
