use crate::config::ComputeConfig;
use crate::error::LibraryError;
use crate::image_calc::ImageCalc;
use crate::loader::image::{load_image, Image};
use crate::util::timing::ScopedTimer;
use image::ColorType;
use log::info;
use std::path::PathBuf;

const USAGE: &str = "usage: cli [--config file.toml] <output.png> <image>...";

#[derive(Debug, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    output: PathBuf,
    inputs: Vec<PathBuf>,
}

impl CliOptions {
    fn parse(args: &[String]) -> Result<Self, LibraryError> {
        let mut config = None;
        let mut positional = Vec::new();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            if arg == "--config" {
                let path = iter
                    .next()
                    .ok_or_else(|| LibraryError::InvalidArgument(format!("--config needs a path\n{}", USAGE)))?;
                config = Some(PathBuf::from(path));
            } else {
                positional.push(PathBuf::from(arg));
            }
        }
        if positional.len() < 2 {
            return Err(LibraryError::InvalidArgument(USAGE.to_string()));
        }
        let output = positional.remove(0);
        Ok(Self {
            config,
            output,
            inputs: positional,
        })
    }
}

/// Computes the per-pixel maximum (albedo) of the input photographs and saves it as PNG.
pub fn run(args: Vec<String>) -> Result<(), LibraryError> {
    let options = CliOptions::parse(&args)?;
    let _timer = ScopedTimer::info("Albedo pass");

    let images = options
        .inputs
        .iter()
        .map(load_image)
        .collect::<Result<Vec<Image>, _>>()?;
    let config = match &options.config {
        Some(path) => ComputeConfig::load(path)?,
        None => ComputeConfig::new(images[0].width, images[0].height),
    };
    let (width, height) = (config.width, config.height);

    let mut calc = ImageCalc::new(config)?;
    let photos: Vec<_> = images.iter().map(|image| calc.load_image(image)).collect();
    let albedo = calc.max(&photos)?;
    let pixels = calc.render_to_pixel_array(albedo)?;

    image::save_buffer(&options.output, pixels, width, height, ColorType::Rgba8)?;
    info!(
        "Wrote {}x{} albedo of {} image(s) to {}",
        width,
        height,
        images.len(),
        options.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_positional_arguments() {
        let options = CliOptions::parse(&args(&["cli", "out.png", "a.png", "b.png"])).unwrap();
        assert_eq!(options.config, None);
        assert_eq!(options.output, PathBuf::from("out.png"));
        assert_eq!(
            options.inputs,
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
    }

    #[test]
    fn test_parse_config_flag() {
        let options =
            CliOptions::parse(&args(&["cli", "--config", "calc.toml", "out.png", "a.png"])).unwrap();
        assert_eq!(options.config, Some(PathBuf::from("calc.toml")));
        assert_eq!(options.inputs.len(), 1);
    }

    #[test]
    fn test_parse_requires_an_input() {
        assert!(matches!(
            CliOptions::parse(&args(&["cli", "out.png"])),
            Err(LibraryError::InvalidArgument(_))
        ));
        assert!(CliOptions::parse(&args(&["cli", "out.png", "a.png", "--config"])).is_err());
    }
}
