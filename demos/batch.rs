use calclet::EvaluationContext;

fn main() {
    let inputs = vec![
        "add(1, 2)",
        "let(x, 5, add(x, let(x, 2, x)))",
        "add(let(x, 1, x), let(x, 2, x))",
        "div(5, 0)",
        "mult(spam, 2)",
        "add(1, 2",
    ];

    let mut context = EvaluationContext::new();
    for source in inputs {
        match context.evaluate_str(source) {
            Ok(value) => println!("{}: {}", source, value),
            Err(err) => println!("{}: {}", source, err),
        }
    }
}
