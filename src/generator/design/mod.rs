//! 设计 token 解析：主题名 -> 固定的 token 集合

use std::sync::Arc;
use tracing::info;

use crate::errors::ValidationError;
use crate::types::profile::Theme;
use crate::types::tokens::{
    BorderTokens, ColorTokens, DesignTokens, FontTokens, ShadowTokens, SizeTokens, SpacingTokens,
};

struct Palette {
    primary: &'static str,
    secondary: &'static str,
    accent: &'static str,
    text: &'static str,
    background: &'static str,
    surface: &'static str,
    muted: &'static str,
}

fn colors(p: Palette) -> ColorTokens {
    ColorTokens {
        primary: p.primary.to_string(),
        secondary: p.secondary.to_string(),
        accent: p.accent.to_string(),
        text: p.text.to_string(),
        background: p.background.to_string(),
        surface: p.surface.to_string(),
        muted: p.muted.to_string(),
    }
}

fn fonts(heading: &str, body: &str) -> FontTokens {
    FontTokens {
        heading: heading.to_string(),
        body: body.to_string(),
        mono: "'JetBrains Mono', 'Fira Code', monospace".to_string(),
    }
}

fn sizes(scale: [&str; 5]) -> SizeTokens {
    let [h1, h2, h3, body, caption] = scale.map(str::to_string);
    SizeTokens {
        h1,
        h2,
        h3,
        body,
        caption,
    }
}

fn spacing(base_rem: f32) -> SpacingTokens {
    let step = |factor: f32| format!("{}rem", base_rem * factor);
    SpacingTokens {
        xs: step(0.25),
        sm: step(0.5),
        md: step(1.0),
        lg: step(2.0),
        xl: step(4.0),
    }
}

/// 解析主题对应的 token 集合
pub fn resolve(theme: Theme) -> DesignTokens {
    match theme {
        Theme::Modern => DesignTokens {
            theme: theme.to_string(),
            colors: colors(Palette {
                primary: "#2563eb",
                secondary: "#0f172a",
                accent: "#06b6d4",
                text: "#1e293b",
                background: "#ffffff",
                surface: "#f8fafc",
                muted: "#64748b",
            }),
            fonts: fonts("'Inter', sans-serif", "'Inter', sans-serif"),
            sizes: sizes(["3rem", "2.25rem", "1.5rem", "1.125rem", "0.875rem"]),
            spacing: spacing(1.0),
            borders: BorderTokens {
                radius: "12px".to_string(),
                width: "1px".to_string(),
            },
            shadows: ShadowTokens {
                card: "0 1px 3px rgba(15, 23, 42, 0.12)".to_string(),
                elevated: "0 10px 30px rgba(15, 23, 42, 0.18)".to_string(),
            },
        },
        Theme::Corporate => DesignTokens {
            theme: theme.to_string(),
            colors: colors(Palette {
                primary: "#1e3a8a",
                secondary: "#334155",
                accent: "#b45309",
                text: "#111827",
                background: "#ffffff",
                surface: "#f3f4f6",
                muted: "#6b7280",
            }),
            fonts: fonts("'Georgia', serif", "'Helvetica Neue', Arial, sans-serif"),
            sizes: sizes(["2.75rem", "2rem", "1.375rem", "1rem", "0.8125rem"]),
            spacing: spacing(0.875),
            borders: BorderTokens {
                radius: "4px".to_string(),
                width: "1px".to_string(),
            },
            shadows: ShadowTokens {
                card: "0 1px 2px rgba(17, 24, 39, 0.10)".to_string(),
                elevated: "0 4px 12px rgba(17, 24, 39, 0.15)".to_string(),
            },
        },
        Theme::Startup => DesignTokens {
            theme: theme.to_string(),
            colors: colors(Palette {
                primary: "#7c3aed",
                secondary: "#111827",
                accent: "#f59e0b",
                text: "#1f2937",
                background: "#fefefe",
                surface: "#f5f3ff",
                muted: "#6b7280",
            }),
            fonts: fonts("'Poppins', sans-serif", "'Inter', sans-serif"),
            sizes: sizes(["3.25rem", "2.5rem", "1.625rem", "1.125rem", "0.875rem"]),
            spacing: spacing(1.125),
            borders: BorderTokens {
                radius: "16px".to_string(),
                width: "2px".to_string(),
            },
            shadows: ShadowTokens {
                card: "0 2px 6px rgba(124, 58, 237, 0.15)".to_string(),
                elevated: "0 12px 32px rgba(124, 58, 237, 0.25)".to_string(),
            },
        },
        Theme::Creative => DesignTokens {
            theme: theme.to_string(),
            colors: colors(Palette {
                primary: "#e11d48",
                secondary: "#0f766e",
                accent: "#facc15",
                text: "#18181b",
                background: "#fffbeb",
                surface: "#fef3c7",
                muted: "#78716c",
            }),
            fonts: fonts("'Playfair Display', serif", "'Source Sans 3', sans-serif"),
            sizes: sizes(["3.5rem", "2.5rem", "1.75rem", "1.125rem", "0.875rem"]),
            spacing: spacing(1.25),
            borders: BorderTokens {
                radius: "24px".to_string(),
                width: "3px".to_string(),
            },
            shadows: ShadowTokens {
                card: "4px 4px 0 rgba(24, 24, 27, 0.85)".to_string(),
                elevated: "8px 8px 0 rgba(24, 24, 27, 0.85)".to_string(),
            },
        },
    }
}

/// 按名称解析；未知主题返回 [`ValidationError::UnknownTheme`]
pub fn resolve_by_name(name: &str) -> Result<DesignTokens, ValidationError> {
    let theme: Theme = name.parse()?;
    Ok(resolve(theme))
}

/// 执行设计 token 解析阶段，每次运行只解析一次，返回共享句柄
pub fn execute(theme: Theme) -> Arc<DesignTokens> {
    info!("🎨 使用主题: {}", theme);
    Arc::new(resolve(theme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_theme_resolves_distinct_tokens() {
        let primaries: HashSet<String> = Theme::ALL
            .iter()
            .map(|theme| resolve(*theme).colors.primary)
            .collect();
        assert_eq!(primaries.len(), Theme::ALL.len());
    }

    #[test]
    fn test_resolve_by_name() {
        assert_eq!(resolve_by_name("Corporate").unwrap().theme, "corporate");
        assert_eq!(
            resolve_by_name("retro"),
            Err(ValidationError::UnknownTheme("retro".to_string()))
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        assert_eq!(resolve(Theme::Startup), resolve(Theme::Startup));
    }

    #[test]
    fn test_css_variables_cover_every_group() {
        let css = resolve(Theme::Modern).to_css_variables();
        for name in [
            "--color-primary: #2563eb;",
            "--font-heading:",
            "--size-h1: 3rem;",
            "--spacing-md: 1rem;",
            "--border-radius: 12px;",
            "--shadow-elevated:",
        ] {
            assert!(css.contains(name), "missing {}", name);
        }
    }
}
