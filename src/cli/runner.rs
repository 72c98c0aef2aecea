use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::{info, warn};

use mscomposite::types::parse_labels;
use mscomposite::{DisplayParams, ImageSpec, build_figure, save_figure};

use super::args::CliArgs;
use super::errors::AppError;

fn prompt_for_file() -> Result<PathBuf, AppError> {
    print!("Enter image filename: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let name = line.trim();
    if name.is_empty() {
        return Err(AppError::MissingArgument {
            arg: "-f/--file".to_string(),
        });
    }
    Ok(PathBuf::from(name))
}

/// Combine an optional preset with the command line; flags win.
pub fn merge_params(
    args: &CliArgs,
    preset: Option<DisplayParams>,
) -> Result<DisplayParams, AppError> {
    let mut params = preset.unwrap_or_default();

    let primary = &mut params.primary;
    if let Some(file) = &args.file {
        primary.path = file.clone();
    }
    if primary.path.as_os_str().is_empty() {
        return Err(AppError::MissingArgument {
            arg: "-f/--file".to_string(),
        });
    }
    primary.bands = args.rgb.or(primary.bands);
    primary.window = args.dims.or(primary.window);
    primary.enhancement = args.enhance.or(primary.enhancement);
    primary.classification |= args.classes;

    if let Some(file2) = &args.file2 {
        let secondary = params
            .secondary
            .get_or_insert_with(|| ImageSpec::new(file2.clone()));
        secondary.path = file2.clone();
    }
    match params.secondary.as_mut() {
        Some(secondary) => {
            secondary.bands = args.rgb2.or(secondary.bands);
            secondary.window = args.dims2.or(secondary.window);
            secondary.enhancement = args.enhance2.or(secondary.enhancement);
            secondary.classification |= args.classes2;
        }
        None => {
            if args.rgb2.is_some()
                || args.dims2.is_some()
                || args.enhance2.is_some()
                || args.classes2
            {
                warn!("-P/-D/-E/-C apply to a second image; none given with -F");
            }
        }
    }

    if let Some(labels) = &args.labels {
        params.labels = Some(parse_labels(labels)?);
    }
    params.opacity = args.alpha.or(params.opacity);
    params.save = args.save.clone().or(params.save);
    Ok(params)
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let preset = match &args.config {
        Some(path) => {
            info!("Loading preset: {:?}", path);
            Some(DisplayParams::from_json_file(path)?)
        }
        None => None,
    };

    let mut args = args;
    if args.file.is_none() && preset.is_none() {
        args.file = Some(prompt_for_file()?);
    }
    let params = merge_params(&args, preset)?;

    if args.no_display && params.save.is_none() {
        return Err(AppError::NothingToDo.into());
    }
    if !args.no_display && !cfg!(feature = "gui") && params.save.is_none() {
        return Err(AppError::ViewerUnavailable.into());
    }

    let rendered = build_figure(&params)?;

    if let Some(output) = &params.save {
        save_figure(&rendered, output)?;
        info!("Successfully saved: {:?}", output);
    }

    if !args.no_display {
        #[cfg(feature = "gui")]
        mscomposite::display(&rendered)?;
        #[cfg(not(feature = "gui"))]
        warn!("Built without the `gui` feature; not opening a viewer");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mscomposite::{BandTriplet, Enhancement, StretchPolicy, Window};

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("mscomposite").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_fill_both_images() {
        let args = parse(&[
            "-f", "left.tif", "-F", "right.tif", "-p", "[4,3,2]", "-d", "[0,0,200,100]", "-e",
            "[0,3000]", "-E", "4", "-C", "-o", "0.3", "-r", "['a','b']", "-s", "out.png",
        ]);
        let params = merge_params(&args, None).unwrap();
        assert_eq!(params.primary.path, PathBuf::from("left.tif"));
        assert_eq!(params.primary.bands, Some(BandTriplet::new(4, 3, 2)));
        assert_eq!(params.primary.window, Some(Window::new(0, 0, 200, 100)));
        assert_eq!(
            params.primary.enhancement,
            Some(Enhancement::ExplicitRange { lo: 0.0, hi: 3000.0 })
        );
        assert!(!params.primary.classification);

        let secondary = params.secondary.unwrap();
        assert_eq!(secondary.path, PathBuf::from("right.tif"));
        assert_eq!(secondary.bands, None);
        assert_eq!(
            secondary.enhancement,
            Some(Enhancement::Named(StretchPolicy::Equalization))
        );
        assert!(secondary.classification);
        assert_eq!(params.opacity, Some(0.3));
        assert_eq!(params.labels, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(params.save, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn flags_override_preset() {
        let preset: DisplayParams = serde_json::from_str(
            r#"{ "primary": { "path": "preset.tif", "enhancement": { "Named": "Linear" } },
                 "secondary": { "path": "under.tif" }, "opacity": 0.5 }"#,
        )
        .unwrap();
        let args = parse(&["-e", "7", "-c"]);
        let params = merge_params(&args, Some(preset)).unwrap();
        assert_eq!(params.primary.path, PathBuf::from("preset.tif"));
        assert_eq!(
            params.primary.enhancement,
            Some(Enhancement::Named(StretchPolicy::SquareRoot))
        );
        assert!(params.primary.classification);
        assert_eq!(params.secondary.unwrap().path, PathBuf::from("under.tif"));
        assert_eq!(params.opacity, Some(0.5));
    }

    #[test]
    fn missing_primary_file_is_reported() {
        let args = parse(&["-e", "2"]);
        let err = merge_params(&args, Some(DisplayParams::default())).unwrap_err();
        assert!(matches!(err, AppError::MissingArgument { .. }));
    }

    #[test]
    fn malformed_values_are_rejected_by_the_parser() {
        let argv = ["mscomposite", "-f", "a.tif", "-e", "9"];
        assert!(CliArgs::try_parse_from(argv).is_err());
        let argv = ["mscomposite", "-f", "a.tif", "-p", "[1,2]"];
        assert!(CliArgs::try_parse_from(argv).is_err());
        let args = parse(&["-f", "a.tif", "-r", "[]"]);
        assert!(matches!(
            merge_params(&args, None),
            Err(AppError::Parse(_))
        ));
    }
}
