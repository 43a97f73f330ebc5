use crate::app::state::AppState;
use crate::install::script::ScriptHost;
use crate::install::InstallerController;
use crate::ui::tui::Tui;
use crate::utils::input::{map_key, Action};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Instant;

pub fn run<H: ScriptHost>(app: &mut AppState, controller: &InstallerController<H>) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.enter()?;

    let result = run_loop(&mut tui, app, controller);

    // restore the terminal even when the loop failed
    let exit = tui.exit();
    result.and(exit)
}

fn run_loop<H: ScriptHost>(
    tui: &mut Tui,
    app: &mut AppState,
    controller: &InstallerController<H>,
) -> Result<()> {
    let frame = app.settings.frame_interval();

    while !app.should_quit {
        app.tick(Instant::now());
        tui.draw(app)?;

        if !event::poll(frame)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match map_key(key, app.view) {
            Action::Quit => app.should_quit = true,
            Action::OptionUp => app.move_selection(-1),
            Action::OptionDown => app.move_selection(1),
            Action::SelectOption(i) => {
                if let Some(option) = crate::install::InstallOption::ALL.get(i) {
                    app.select(*option);
                }
            }
            Action::Confirm => {
                let option = app.installer.selected;
                let status = if option.shortcut_kind().is_some() {
                    "Creating shortcut..."
                } else {
                    "Skipping shortcut creation..."
                };
                if !app.begin_request(status) {
                    continue;
                }
                // show the busy state before blocking on the request
                tui.draw(app)?;
                let result = controller
                    .choose(option)
                    .map(|msg| (msg, controller.complete_install()));
                app.finish_request(result, Instant::now());
            }
            Action::Skip => {
                if !app.begin_request("Skipping installation, opening player...") {
                    continue;
                }
                tui.draw(app)?;
                let result = controller
                    .skip()
                    .map(|msg| (msg, controller.complete_install()));
                app.finish_request(result, Instant::now());
            }
            Action::None => {}
        }
    }

    Ok(())
}
