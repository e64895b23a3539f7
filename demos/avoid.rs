use primacy::{image::io::Reader as ImageReader, Color, Extractor, Options};

// extracts distinct colors on the background worker, staying away from white, black and a skin tone
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "image.jpg".to_string());
    let image = ImageReader::open(path)?.decode()?.to_rgba8();

    let extractor = Extractor::new();
    let options =
        Options::ONLY_DISTINCT_COLORS | Options::AVOID_WHITE | Options::AVOID_BLACK | Options::ORDER_BY_BRIGHTNESS;
    let colors = extractor
        .extract_colors(image, options, vec![Color::new(0.87, 0.67, 0.53)])
        .wait()?;

    for color in colors {
        let (r, g, b) = color.into_format::<u8>().into_components();
        println!("#{:02x}{:02x}{:02x}", r, g, b);
    }

    Ok(())
}
