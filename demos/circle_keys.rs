use livesketch::{Attributes, Circle, EpsWriter, Shape};

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let c = Circle::new((5.0, 7.0), 3)?;
    println!("{:?}", c.point_keys());
    println!("{}", c.points()["c"]);
    println!("{}", c.points()["center"]);
    println!("{:?}", c.length_keys());

    let bbox = c.boundingbox();
    println!("{:?}", bbox.point_keys());

    if std::env::args().any(|arg| arg == "--eps") {
        let doc = EpsWriter::new().verbose(true).to_string(&[c.into()])?;
        print!("{doc}");
    }
    Ok(())
}
