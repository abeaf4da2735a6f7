//! Generated program text, checked through the public calculator API.
//!
//! Nothing here draws: sources are generated on demand without rendering.

use imagecalc::{Channel, ComputeConfig, ContextState, Image, ImageCalc, LibraryError};

fn calc() -> ImageCalc {
    ImageCalc::new(ComputeConfig::new(4, 4)).unwrap()
}

fn image(seed: u8) -> Image {
    Image::solid(4, 4, [seed, seed, seed, 255]).unwrap()
}

#[test]
fn declarations_follow_creation_order() {
    let mut calc = calc();
    let a = calc.load_image(&image(1));
    let b = calc.load_image(&image(2));
    let c = calc.load_image(&image(3));
    let low = calc.min(&[a, b, c]).unwrap();
    let two = calc.load_number(2.0).unwrap();
    let scaled = calc.multiply(&[low, two]).unwrap();

    let fragment = calc.shader_sources(scaled).fragment;
    let order: Vec<usize> = ["color_1 =", "color_3 =", "color_5 =", "color_7 =", "color_8 ="]
        .iter()
        .map(|needle| fragment.find(needle).unwrap())
        .collect();
    assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(fragment.contains("float4 color_7 = min(min(color_1, color_3), color_5);"));
    assert!(fragment.contains("float4 color_8 = color_7 * float4(2.0, 2.0, 2.0, 1.0);"));
    assert!(fragment.contains("return half4(color_8);"));
}

#[test]
fn one_sampler_per_distinct_image() {
    let mut calc = calc();
    let photo = image(7);
    let a = calc.load_image(&photo);
    let b = calc.load_image(&photo);
    let sum = calc.add(&[a, b]).unwrap();

    let fragment = calc.shader_sources(sum).fragment;
    assert_eq!(fragment.matches("uniform shader").count(), 1);
    assert!(fragment.contains("float4 color_3 = color_1 + color_1;"));
}

#[test]
fn samplers_are_declared_in_first_use_order() {
    let mut calc = calc();
    let first = calc.load_image(&image(1));
    let second = calc.load_image(&image(2));
    let sum = calc.add(&[second, first]).unwrap();

    let fragment = calc.shader_sources(sum).fragment;
    let sampler_2 = fragment.find("uniform shader sampler_2;").unwrap();
    let sampler_4 = fragment.find("uniform shader sampler_4;").unwrap();
    assert!(sampler_2 < sampler_4);
    assert!(fragment.contains("float4 color_5 = color_3 + color_1;"));
}

#[test]
fn scalar_result_is_broadcast() {
    let mut calc = calc();
    let photo = calc.load_image(&image(9));
    let green = calc.get_channel(photo, Channel::try_from(1).unwrap()).unwrap();

    let fragment = calc.shader_sources(green).fragment;
    assert!(fragment.contains("float value_3 = color_1.g;"));
    assert!(fragment.contains("return half4(float4(value_3, value_3, value_3, 1.0));"));
}

#[test]
fn scalar_min_stays_scalar() {
    let mut calc = calc();
    let photo = calc.load_image(&image(9));
    let red = calc.get_channel(photo, Channel::Red).unwrap();
    let blue = calc.get_channel(photo, Channel::Blue).unwrap();
    let low = calc.min(&[red, blue]).unwrap();
    assert!(
        calc.shader_sources(low)
            .fragment
            .contains("float value_5 = min(value_3, value_4);")
    );
}

#[test]
fn invalid_operations_are_rejected() {
    let mut calc = calc();
    let photo = calc.load_image(&image(1));
    let scalar = calc.load_number(0.5).unwrap();

    let mixed = calc.max(&[photo, scalar]);
    assert!(matches!(mixed, Err(LibraryError::InvalidOperation(_))));

    let lonely = calc.add(&[photo]);
    assert!(matches!(lonely, Err(LibraryError::InvalidOperation(_))));

    let channel_of_scalar = calc.get_channel(scalar, Channel::Alpha);
    assert!(matches!(channel_of_scalar, Err(LibraryError::InvalidOperation(_))));

    let composed = calc.compose_from_channels(photo, scalar, scalar, scalar);
    assert!(matches!(composed, Err(LibraryError::InvalidOperation(_))));

    assert!(matches!(
        Channel::try_from(4),
        Err(LibraryError::InvalidArgument(_))
    ));
    assert!(matches!(
        calc.load_number(f64::NAN),
        Err(LibraryError::InvalidArgument(_))
    ));
}

#[test]
fn generating_sources_does_not_render() {
    let mut calc = calc();
    let photo = calc.load_image(&image(1));
    let sources = calc.shader_sources(photo);
    assert!(sources.vertex.contains("uniform float2 resolution;"));
    assert!(sources.linked().contains("half4 main(float2 coord) {"));
    assert_eq!(calc.state(), ContextState::Bound);
}
