use text_image::image::{imageops, Rgba, RgbaImage};
use text_image::{Align, Effect, Quality, RenderConfig, TextImage, VAlign};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // a small gradient, stretched to fill the whole canvas
    let mut background = RgbaImage::new(64, 64);
    imageops::vertical_gradient(
        &mut background,
        &Rgba([0, 0, 255, 255]),
        &Rgba([255, 0, 128, 255]),
    );
    let background_path = std::env::temp_dir().join("text-image-gradient.png");
    background
        .save(&background_path)
        .expect("can save background");

    let config = RenderConfig::builder()
        .width(600)
        .padding(40)
        .background_image(&background_path)
        .text_colour("#ffffffd0")
        .alignment(Align::Right, VAlign::Bottom)
        .effect(Effect::Brightness(-30))
        .build()
        .expect("valid config");

    TextImage::new(config)
        .save(
            &lipsum::lipsum(40),
            "image-background.png",
            None,
            Quality(95),
        )
        .expect("can save image");
}
