//! `roi-inspect`: look at stored regions from the command line.
//!
//! Regions live in the file-backed store under the platform data directory,
//! one JSON file per camera, in the same format the HTTP endpoint serves.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use roi_editor::config::load_native_config;
    use roi_editor::persistence::FileBackend;
    use roi_editor::snapshot::image_size;
    use roi_editor::viewport::fit_with_fraction;
    use roi_editor::{EditorConfig, EditorError, PersistenceClient, Point, Result, ShapeStore, logging};

    const USAGE: &str = "usage: roi-inspect <camera-id> [list | fit <image> <window-w> <window-h> | contains <x> <y> | clear]";

    #[derive(Debug, PartialEq)]
    enum Command {
        List,
        Fit {
            image: PathBuf,
            window_width: f64,
            window_height: f64,
        },
        Contains(Point),
        Clear,
    }

    fn parse_args(args: &[String]) -> Option<(String, Command)> {
        let (camera_id, rest) = args.split_first()?;
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
        let command = match rest.as_slice() {
            [] | ["list"] => Command::List,
            ["fit", image, w, h] => Command::Fit {
                image: PathBuf::from(*image),
                window_width: w.parse().ok()?,
                window_height: h.parse().ok()?,
            },
            ["contains", x, y] => Command::Contains(Point::new(x.parse().ok()?, y.parse().ok()?)),
            ["clear"] => Command::Clear,
            _ => return None,
        };
        Some((camera_id.clone(), command))
    }

    fn execute(config: &EditorConfig, camera_id: &str, command: Command) -> Result<()> {
        let backend = FileBackend::in_data_dir().ok_or_else(|| {
            EditorError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no data directory on this platform",
            ))
        })?;
        log::debug!("Region store at {:?}", backend.root());
        let client = PersistenceClient::new(backend, camera_id)?;

        match command {
            Command::List => {
                let shapes = pollster::block_on(client.load())?;
                println!("{} regions for camera {}", shapes.len(), camera_id);
                for (index, shape) in shapes.iter().enumerate() {
                    let vertices = shape.vertices().map_or(4, <[Point]>::len);
                    println!(
                        "  [{}] {} ({} points){}",
                        index,
                        shape.geometry.kind_name(),
                        vertices,
                        shape.name().map(|n| format!(" \"{n}\"")).unwrap_or_default()
                    );
                }
            }
            Command::Fit {
                image,
                window_width,
                window_height,
            } => {
                let (width, height) = image_size(&image)?;
                let fit = fit_with_fraction(
                    window_width,
                    window_height,
                    f64::from(width),
                    f64::from(height),
                    config.fit_fraction,
                )?;
                println!(
                    "{}x{} image -> {}x{} canvas at scale {}",
                    width, height, fit.canvas_width, fit.canvas_height, fit.scale
                );
            }
            Command::Contains(point) => {
                let mut store = ShapeStore::new();
                store.replace_all(pollster::block_on(client.load())?);
                let hits = store.regions_containing(&point);
                if hits.is_empty() {
                    println!("({}, {}) is outside every region", point.x, point.y);
                }
                for index in hits {
                    println!("({}, {}) is inside region {}", point.x, point.y, index);
                }
            }
            Command::Clear => {
                let message = pollster::block_on(client.clear())?;
                println!("{message}");
            }
        }
        Ok(())
    }

    pub fn main() -> ExitCode {
        let config = load_native_config();
        logging::init(config.log_level);

        let args: Vec<String> = std::env::args().skip(1).collect();
        let Some((camera_id, command)) = parse_args(&args) else {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        };

        match execute(&config, &camera_id, command) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        #[test]
        fn test_parse_list_default() {
            assert_eq!(
                parse_args(&args(&["cam1"])),
                Some(("cam1".to_string(), Command::List))
            );
        }

        #[test]
        fn test_parse_fit() {
            let (_, command) = parse_args(&args(&["7", "fit", "snap.jpg", "1000", "800"])).unwrap();
            assert_eq!(
                command,
                Command::Fit {
                    image: PathBuf::from("snap.jpg"),
                    window_width: 1000.0,
                    window_height: 800.0,
                }
            );
        }

        #[test]
        fn test_parse_contains() {
            let (_, command) = parse_args(&args(&["7", "contains", "1.5", "2"])).unwrap();
            assert_eq!(command, Command::Contains(Point::new(1.5, 2.0)));
        }

        #[test]
        fn test_parse_rejects_bad_input() {
            assert!(parse_args(&[]).is_none());
            assert!(parse_args(&args(&["7", "contains", "x", "2"])).is_none());
            assert!(parse_args(&args(&["7", "explode"])).is_none());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::main()
}

// WASM doesn't use main(), the editor is created from JS
#[cfg(target_arch = "wasm32")]
fn main() {}
