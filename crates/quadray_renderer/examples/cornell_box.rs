//! Closed-box demo scene.
//!
//! Six huge spheres form the walls of a box around a white sphere, a mirror
//! ball, a glass ball and a hyperboloid. Renders to PNG.
//!
//! Usage: `cargo run --release --example cornell_box [config.json] [output.png]`

use anyhow::{Context, Result};
use quadray_renderer::{
    render, Camera, Color, Hyperboloid, Light, Material, RenderConfig, Scene, Sphere, DVec3,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(&PathBuf::from(path))?,
        None => RenderConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "quadray.png".to_string());

    let scene = build_scene();
    let frame = render(&scene, &config).context("render failed")?;

    frame
        .to_rgb_image()
        .save(&output)
        .with_context(|| format!("failed to save {output}"))?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn load_config(path: &PathBuf) -> Result<RenderConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(config)
}

fn build_scene() -> Scene {
    let camera = Camera::new()
        .with_resolution(640, 480)
        .with_focus(DVec3::new(0.0, 0.0, 55.0))
        .with_fov(90.0_f64.to_radians());
    let light = Light::new(DVec3::new(-10.0, -20.0, 40.0), 1e9);

    let white = Material::diffuse(Color::ONE);

    Scene::new(light, camera)
        // Contents
        .with_primitive(Sphere::new(DVec3::new(0.0, -2.0, 25.0), 10.0, white))
        .with_primitive(Sphere::new(DVec3::new(-22.0, 8.0, 10.0), 8.0, Material::mirror()))
        .with_primitive(Sphere::new(DVec3::new(20.0, 10.0, 30.0), 6.0, Material::glass(1.5)))
        .with_primitive(Hyperboloid::new(
            DVec3::new(0.0, 0.0, -20.0),
            DVec3::new(10.0, 35.0, 10.0),
            Material::diffuse(Color::new(1.0, 0.5, 0.0)),
        ))
        // Walls: back, front, right, left, floor, ceiling
        .with_primitive(Sphere::new(DVec3::new(0.0, 0.0, 1000.0), 940.0, white))
        .with_primitive(Sphere::new(DVec3::new(0.0, 0.0, -1000.0), 940.0, white))
        .with_primitive(Sphere::new(
            DVec3::new(1000.0, 0.0, 0.0),
            940.0,
            Material::diffuse(Color::new(0.0, 0.0, 1.0)),
        ))
        .with_primitive(Sphere::new(
            DVec3::new(-1000.0, 0.0, 0.0),
            940.0,
            Material::diffuse(Color::new(1.0, 0.0, 0.0)),
        ))
        .with_primitive(Sphere::new(
            DVec3::new(0.0, 1000.0, 0.0),
            990.0,
            Material::diffuse(Color::new(1.0, 1.0, 0.0)),
        ))
        .with_primitive(Sphere::new(
            DVec3::new(0.0, -1000.0, 0.0),
            940.0,
            Material::diffuse(Color::new(0.0, 1.0, 0.0)),
        ))
}
