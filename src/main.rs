// SPDX-License-Identifier: MPL-2.0
use face_enroll::api::{ApiRoutes, HttpBackend};
use face_enroll::config;
use face_enroll::domain::CropRect;
use face_enroll::form::{Feedback, FormOrchestrator, Severity};
use face_enroll::i18n::I18n;
use face_enroll::media::SelectedFile;
use face_enroll::paths;
use std::path::PathBuf;
use std::process::ExitCode;

struct Args {
    lang: Option<String>,
    config_dir: Option<String>,
    server: Option<String>,
    routes: Option<ApiRoutes>,
    crop: Option<CropRect>,
    iin: String,
    photo: PathBuf,
}

fn parse_args(mut pargs: pico_args::Arguments) -> Result<Args, pico_args::Error> {
    let args = Args {
        lang: pargs.opt_value_from_str("--lang")?,
        config_dir: pargs.opt_value_from_str("--config-dir")?,
        server: pargs.opt_value_from_str("--server")?,
        routes: pargs.opt_value_from_str("--routes")?,
        crop: pargs.opt_value_from_fn("--crop", parse_crop_box)?,
        iin: pargs.free_from_str()?,
        photo: pargs.free_from_str()?,
    };

    let rest = pargs.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {:?}", rest),
        });
    }
    Ok(args)
}

/// Parses `X,Y,W,H` in source image pixels.
fn parse_crop_box(text: &str) -> Result<CropRect, String> {
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    match values.as_slice() {
        [x, y, width, height] if values.iter().all(|v| v.is_finite()) => {
            Ok(CropRect::new(*x, *y, *width, *height))
        }
        _ => Err(format!("expected X,Y,W,H, got {:?}", text)),
    }
}

fn report(i18n: &I18n, feedback: Option<Feedback>) {
    let Some(feedback) = feedback else {
        return;
    };
    let text = feedback.render(i18n);
    match feedback.severity() {
        Severity::Error => eprintln!("{}", text),
        Severity::Success | Severity::Info => println!("{}", text),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut pargs = pico_args::Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        println!("{}", I18n::default().tr("cli-usage"));
        return ExitCode::SUCCESS;
    }

    let args = match parse_args(pargs) {
        Ok(args) => args,
        Err(err) => {
            let i18n = I18n::default();
            eprintln!(
                "{}",
                i18n.tr_with_args("cli-error-arguments", &[("error", err.to_string())])
            );
            eprintln!("{}", i18n.tr("cli-usage"));
            return ExitCode::from(2);
        }
    };

    paths::init_cli_overrides(args.config_dir.clone());
    let (mut config, warning) = config::load();
    if let Some(server) = args.server {
        config.server.base_url = Some(server);
    }
    if let Some(routes) = args.routes {
        config.server.routes = Some(routes);
    }

    let i18n = I18n::new(args.lang, &config);
    if let Some(key) = warning {
        eprintln!("{}", i18n.tr(&key));
    }

    let backend = match HttpBackend::new(&config.base_url(), config.routes()) {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut form = FormOrchestrator::from_config(backend, &config);

    match form.check_identity(&args.iin).await {
        Ok(_) => {
            if let Some(name) = form.view().user_name {
                println!("{}", i18n.tr_with_args("cli-user", &[("name", name)]));
            }
        }
        Err(_) => {
            report(&i18n, form.view().iin_feedback);
            return ExitCode::FAILURE;
        }
    }

    let file = match SelectedFile::from_path(&args.photo) {
        Ok(file) => file,
        Err(err) => {
            eprintln!(
                "{}",
                i18n.tr_with_args("cli-error-read-photo", &[("error", err.to_string())])
            );
            return ExitCode::FAILURE;
        }
    };
    if form.select_photo(&file).is_err() {
        report(&i18n, form.view().photo_feedback);
        return ExitCode::FAILURE;
    }

    if let Some(rect) = args.crop {
        if let Err(err) = form.adjust_crop(rect) {
            eprintln!(
                "{}",
                i18n.tr_with_args("cli-error-crop-box", &[("error", err.to_string())])
            );
            return ExitCode::FAILURE;
        }
    }

    if form.apply_crop().is_err() {
        report(&i18n, form.view().photo_feedback);
        return ExitCode::FAILURE;
    }
    if let Some(note) = form.view().preview.success_note {
        println!("{}", i18n.tr(note));
    }

    let submitted = form.submit().await;
    report(&i18n, form.view().submit_feedback);
    if submitted.is_err() {
        return ExitCode::FAILURE;
    }

    form.settle().await;
    report(&i18n, Some(Feedback::info("form-reset")));
    ExitCode::SUCCESS
}
