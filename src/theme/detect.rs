use tracing::debug;

use super::ThemeVariant;

/// Luma above which the terminal background counts as light.
const LIGHT_LUMA: f32 = 0.6;

/// Guesses the terminal background by querying its luma. Falls back to dark
/// when the terminal does not answer.
pub fn detect_terminal_theme() -> ThemeVariant {
    match terminal_light::luma() {
        Ok(luma) => {
            debug!(luma, "terminal background detected");
            variant_for_luma(luma)
        }
        Err(e) => {
            debug!(error = %e, "terminal background detection failed");
            ThemeVariant::Dark
        }
    }
}

fn variant_for_luma(luma: f32) -> ThemeVariant {
    if luma > LIGHT_LUMA {
        ThemeVariant::Light
    } else {
        ThemeVariant::Dark
    }
}
