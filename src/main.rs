use std::fs::File;
use std::io::{Stdout, stdout};
use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use space_raiders::{App, Cli, GameConfig};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let config = GameConfig::from(&cli);
    log::info!(
        "starting: field {}x{}, {} fps, assets in {}",
        config.field.width,
        config.field.height,
        config.fps,
        config.asset_dir.display()
    );

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    if !supports_keyboard_enhancement {
        log::warn!(
            "terminal does not report key releases: held keys time out and 2 player mode is off"
        );
    }

    // Put the terminal back before any panic report is printed
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        hook(info);
    }));

    let mut terminal = setup_terminal(supports_keyboard_enhancement)?;
    let result = App::new(config, supports_keyboard_enhancement).run(&mut terminal);
    let restored = restore_terminal(&mut terminal, supports_keyboard_enhancement);

    if let Err(err) = &result {
        log::error!("exiting with error: {err}");
    }
    result.and(restored)
}

/// Log to a file: stdout belongs to the game screen
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn setup_terminal(keyboard_enhancement: bool) -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().wrap_err("enabling raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).wrap_err("entering alternate screen")?;

    // Enable keyboard enhancement AFTER entering alternate screen
    if keyboard_enhancement {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )
        .wrap_err("enabling keyboard enhancement")?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).wrap_err("creating terminal")?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    keyboard_enhancement: bool,
) -> Result<()> {
    if keyboard_enhancement {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
