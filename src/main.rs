use anyhow::bail;
use calclet::EvaluationContext;

const USAGE: &str =
    "input argument not formed properly. Correct input format: calclet \"add(1, 2)\"";

/// Enable with `RUST_LOG=calclet=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let expression = match (args.next(), args.next()) {
        (Some(expression), None) => expression,
        _ => bail!(USAGE),
    };

    let mut context = EvaluationContext::new();
    let result = context.evaluate_str(&expression)?;
    println!("{}", result);

    Ok(())
}
