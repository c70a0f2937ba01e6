use text_image::{Align, LineHeight, Quality, RenderConfig, TextImage, VAlign};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // pass a .ttf path to draw with an outline font instead of the built-in bitmaps
    let mut builder = RenderConfig::builder();
    builder
        .width(800)
        .padding(50)
        .line_height(LineHeight::Auto)
        .background_colour("#fdf6e3")
        .text_colour("#586e75")
        .alignment(Align::Center, VAlign::Middle);
    if let Some(font) = std::env::args().nth(1) {
        builder.font_path(font).font_size(22);
    }
    let config = builder.build().expect("valid config");

    let text = format!("{}\n\n{}", lipsum::lipsum(12), lipsum::lipsum(120));
    TextImage::new(config)
        .save(&text, "lorem-ipsum.jpg", None, Quality(85))
        .expect("can save image");
}
