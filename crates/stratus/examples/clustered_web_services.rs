//! Example: describing a clustered web service and writing its DOT source.
//!
//! Run with `cargo run --example clustered_web_services -p stratus`.
//! Set `FORMAT=png` to render an image instead (requires Graphviz).

use std::env;

use stratus::{
    DiagramBuilder,
    config::AppConfig,
    semantic::{Category, Header, Link, LineStyle, OutputFormat},
};

fn main() {
    let format: OutputFormat = env::var("FORMAT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(OutputFormat::Dot);

    let mut config = AppConfig::default();
    config.render_mut().set_format(format);
    let builder = DiagramBuilder::new(config);

    let header = Header::new("Clustered Web Services").with_filename("clustered_web_services");
    let artifact = builder
        .draw(header, |canvas| {
            let dns = canvas.node("dns", Category::Dns);
            let lb = canvas.node("lb", Category::LoadBalancer);

            let services = canvas.cluster("Services", |canvas| {
                Ok((1..=3)
                    .map(|n| canvas.node(format!("web{n}"), Category::Compute))
                    .collect::<Vec<_>>())
            })?;

            let (primary, replica) = canvas.cluster("DB Cluster", |canvas| {
                let primary = canvas.node("userdb", Category::Database);
                let replica = canvas.node("userdb ro", Category::Database);
                canvas.line(primary, replica)?;
                Ok((primary, replica))
            })?;

            let memcached = canvas.node("memcached", Category::Storage);

            canvas.link(dns, lb)?;
            canvas.link(lb, &services)?;
            canvas.connect(&services, primary, Link::forward().with_label("writes"))?;
            canvas.connect(
                &services,
                replica,
                Link::forward().with_style(LineStyle::Dashed),
            )?;
            canvas.link(&services, memcached)?;
            Ok(())
        })
        .expect("Failed to draw diagram");

    println!("Diagram written to {}", artifact.path().display());
}
