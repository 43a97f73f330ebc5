use anyhow::{bail, Context, Result};
use core_music::app::state::{AppState, View};
use core_music::data::install_config::ConfigStore;
use core_music::data::paths::Paths;
use core_music::data::settings::Settings;
use core_music::download::{file_name_from_url, Downloader, HttpFetch};
use core_music::install::{InstallerController, ShortcutKind, ShortcutProvisioner};
use core_music::ui::theme::Theme;
use core_music::{app, utils, APP_NAME, VERSION};

const USAGE: &str = "\
usage: core-music [command]

  (no command)                         open the player (installer on first run)
  status                               print whether the installer would be shown
  install <desktop|startmenu|none>     create a shortcut, or opt out
  skip                                 opt out of shortcut creation
  remove-shortcut <desktop|startmenu>  delete a shortcut
  download <url> [filename]            save a file to the desktop
  help                                 show this message";

fn main() -> Result<()> {
    let paths = Paths::resolve();
    utils::logging::init(&paths.log_file)?;
    log_startup(&paths);

    let settings = Settings::load_or_default(&paths.settings_file);
    let controller = InstallerController::new(
        ConfigStore::new(paths.config_file.clone()),
        ShortcutProvisioner::for_platform(paths.clone()),
        settings.transition_delay(),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => run_shell(&controller, settings),
        Some("status") => {
            let needs = controller.needs_install();
            println!("{}", if needs { "installer" } else { "player" });
            Ok(())
        }
        Some("install") => {
            let option = args.get(1).context("install needs an option")?;
            report(controller.choose_option(option))
        }
        Some("skip") => report(controller.skip()),
        Some("remove-shortcut") => {
            let kind = match args.get(1).map(String::as_str) {
                Some("desktop") => ShortcutKind::Desktop,
                Some("startmenu") | Some("start-menu") => ShortcutKind::StartMenu,
                other => bail!("unknown shortcut kind {other:?}\n\n{USAGE}"),
            };
            report(controller.remove_shortcut(kind))
        }
        Some("download") => {
            let url = args.get(1).context("download needs a url")?;
            let name = match args.get(2) {
                Some(n) => n.clone(),
                None => file_name_from_url(url).context("cannot derive a file name; pass one")?,
            };
            let downloader = Downloader::new(
                paths.desktop_dir.clone(),
                HttpFetch::new(settings.download_timeout()),
                settings.download_attempts,
                settings.download_retry_delay(),
            );
            let got = downloader.download(url, &name)?;
            println!("{}", got.path.display());
            Ok(())
        }
        Some("help") | Some("--help") | Some("-h") => {
            println!("{USAGE}");
            Ok(())
        }
        Some(other) => bail!("unknown command {other:?}\n\n{USAGE}"),
    }
}

fn run_shell(controller: &InstallerController, settings: Settings) -> Result<()> {
    let needs_install = controller.needs_install();
    log::info!("Installation needed: {needs_install}");
    let view = if needs_install {
        log::info!("Showing installation screen");
        View::Installer
    } else {
        log::info!("Showing main player screen");
        View::Player
    };

    let theme = Theme::from_settings(&settings);
    let mut app = AppState::new(view, settings, theme);
    app::event_loop::run(&mut app, controller)
}

fn report<E: std::error::Error + Send + Sync + 'static>(result: Result<String, E>) -> Result<()> {
    let msg = result?;
    println!("{msg}");
    Ok(())
}

fn log_startup(paths: &Paths) {
    log::info!("{}", "=".repeat(50));
    log::info!("{APP_NAME} v{VERSION} starting");
    log::info!("Platform: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    if let Ok(cwd) = std::env::current_dir() {
        log::info!("Current directory: {}", cwd.display());
    }
    if let Ok(exe) = std::env::current_exe() {
        log::info!("Executable: {}", exe.display());
    }
    log::info!("Config: {}", paths.config_file.display());
}
