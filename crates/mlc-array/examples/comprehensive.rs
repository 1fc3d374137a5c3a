use std::path::PathBuf;

use anyhow::{Context as _, Result};

use mlc_array::{Context, EngineConfig, NumericArray, TypedBuffer};

fn show(label: &str, array: &NumericArray) {
    println!("{} shape={} data={:?}", label, array.shape(), array.data());
}

fn main() -> Result<()> {
    env_logger::init();

    let ctx = Context::new(EngineConfig::default());

    // 1D vector from integers
    let mut vec = ctx.prepare_data(TypedBuffer::Int(&[1, -2, 3, -4, 5]), &[5])?;
    show("input 1D", &vec);
    ctx.relu(&mut vec)?;
    show("after relu", &vec);
    ctx.sigmoid(&mut vec)?;
    show("after sigmoid", &vec);

    // 2D matrix from f32
    let mut mat = ctx.prepare_data(
        TypedBuffer::Float(&[1.0, -2.0, 3.0, 4.0, -5.0, 6.0]),
        &[2, 3],
    )?;
    ctx.tanh(&mut mat)?;
    show("after tanh", &mat);
    ctx.leaky_relu(&mut mat, 0.01)?;
    show("after leaky relu (alpha=0.01)", &mat);

    // 3D tensor from f64
    let mut tensor = ctx.prepare_data(
        TypedBuffer::Double(&[1.0, -1.0, 2.0, 0.0, 3.0, -2.0, 4.0, 1.0, -1.0, 2.0, -3.0, 0.5]),
        &[3, 2, 2],
    )?;
    ctx.swish(&mut tensor)?;
    show("after swish", &tensor);
    ctx.softmax(&mut tensor)?;
    show("after softmax", &tensor);

    // Vector algebra
    let a = ctx.prepare_data(TypedBuffer::Float(&[1.0, 2.0, 3.0]), &[3])?;
    let b = ctx.prepare_data(TypedBuffer::Float(&[4.0, 5.0, 6.0]), &[3])?;
    let mut result = NumericArray::zeros(&[3])?;
    ctx.add(&a, &b, &mut result)?;
    show("a + b", &result);
    ctx.subtract(&a, &b, &mut result)?;
    show("a - b", &result);
    println!("a . b = {}", ctx.dot(&a, &b)?);
    ctx.scale(&a, 2.0, &mut result)?;
    show("2 * a", &result);

    // Optional CSV path as the first argument
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        let mut table = ctx
            .read_csv(&path)
            .with_context(|| format!("Failed to read CSV: {}", path.display()))?;
        show("csv", &table);
        ctx.sigmoid(&mut table)?;
        show("csv after sigmoid", &table);
        table.release();
    }

    // Error handling: a released array is rejected
    let mut released = vec.clone();
    released.release();
    if let Err(e) = ctx.relu(&mut released) {
        println!("caught: {}", e);
    }

    Ok(())
}
