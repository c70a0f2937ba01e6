use text_image::{BuiltinFont, OutputFormat, Quality, RenderConfig, TextImage};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RenderConfig::builder()
        .width(320)
        .padding(20)
        .builtin_font(BuiltinFont::Giant)
        .build()
        .expect("valid config");

    TextImage::new(config)
        .save(
            "Hello, world!\nThis is simple mode.",
            "hello-world.png",
            Some(OutputFormat::Png),
            Quality::default(),
        )
        .expect("can save image");
}
