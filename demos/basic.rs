use primacy::image::io::Reader as ImageReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "image.jpg".to_string());
    let image = ImageReader::open(path)?.decode()?.to_rgba8();

    let palette = primacy::Palette::from_image(image)
        .resize_image_area(112 * 112)
        .generate()?;

    println!("{:#?}", palette);
    Ok(())
}
