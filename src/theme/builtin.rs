use super::{ResolvedTheme, Theme, ThemeColor, ThemeColors, ThemeVariant};

pub fn all_themes() -> Vec<Theme> {
    vec![default_dark(), default_light(), monokai(), gruvbox_light()]
}

/// Looks a theme up by name. `dark` and `light` alias the variant defaults.
pub fn by_name(name: &str) -> Option<Theme> {
    match name {
        "dark" => Some(monokai()),
        "light" => Some(default_light()),
        _ => all_themes().into_iter().find(|t| t.name == name),
    }
}

pub fn default_for_variant(variant: ThemeVariant) -> ResolvedTheme {
    match variant {
        ThemeVariant::Dark => monokai().into(),
        ThemeVariant::Light => default_light().into(),
    }
}

fn named(s: &'static str) -> ThemeColor {
    ThemeColor::Named(s)
}

fn hex(s: &'static str) -> ThemeColor {
    ThemeColor::Hex(s)
}

pub fn default_dark() -> Theme {
    Theme {
        name: "default-dark".to_string(),
        variant: ThemeVariant::Dark,
        colors: ThemeColors {
            foreground: named("white"),
            foreground_dim: hex("#6A9A9A"),
            border: hex("#6A9A9A"),
            selection_bg: named("darkgray"),
            primary: named("yellow"),
            error: named("red"),
            joke_text: named("white"),
            joke_category: named("cyan"),
            liked: named("lightred"),
            badge: named("magenta"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("yellow"),
        },
    }
}

pub fn default_light() -> Theme {
    Theme {
        name: "default-light".to_string(),
        variant: ThemeVariant::Light,
        colors: ThemeColors {
            foreground: named("black"),
            foreground_dim: named("darkgray"),
            border: named("darkgray"),
            selection_bg: named("lightblue"),
            primary: named("blue"),
            error: named("red"),
            joke_text: named("black"),
            joke_category: named("blue"),
            liked: named("red"),
            badge: named("magenta"),
            status_bar_bg: named("blue"),
            status_bar_fg: named("white"),
            spinner: named("blue"),
        },
    }
}

pub fn monokai() -> Theme {
    Theme {
        name: "monokai".to_string(),
        variant: ThemeVariant::Dark,
        colors: ThemeColors {
            foreground: hex("#F8F8F2"),
            foreground_dim: hex("#75715E"),
            border: hex("#75715E"),
            selection_bg: hex("#49483E"),
            primary: hex("#A6E22E"),
            error: hex("#F92672"),
            joke_text: hex("#F8F8F2"),
            joke_category: hex("#66D9EF"),
            liked: hex("#F92672"),
            badge: hex("#FD971F"),
            status_bar_bg: hex("#A6E22E"),
            status_bar_fg: hex("#272822"),
            spinner: hex("#E6DB74"),
        },
    }
}

pub fn gruvbox_light() -> Theme {
    Theme {
        name: "gruvbox-light".to_string(),
        variant: ThemeVariant::Light,
        colors: ThemeColors {
            foreground: hex("#3C3836"),
            foreground_dim: hex("#928374"),
            border: hex("#A89984"),
            selection_bg: hex("#EBDBB2"),
            primary: hex("#AF3A03"),
            error: hex("#9D0006"),
            joke_text: hex("#3C3836"),
            joke_category: hex("#076678"),
            liked: hex("#9D0006"),
            badge: hex("#8F3F71"),
            status_bar_bg: hex("#AF3A03"),
            status_bar_fg: hex("#FBF1C7"),
            spinner: hex("#B57614"),
        },
    }
}
