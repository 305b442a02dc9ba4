use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorTokens {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub text: String,
    pub background: String,
    pub surface: String,
    pub muted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontTokens {
    pub heading: String,
    pub body: String,
    pub mono: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeTokens {
    pub h1: String,
    pub h2: String,
    pub h3: String,
    pub body: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingTokens {
    pub xs: String,
    pub sm: String,
    pub md: String,
    pub lg: String,
    pub xl: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderTokens {
    pub radius: String,
    pub width: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowTokens {
    pub card: String,
    pub elevated: String,
}

/// 一个主题解析出的完整视觉词汇
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    pub theme: String,
    pub colors: ColorTokens,
    pub fonts: FontTokens,
    pub sizes: SizeTokens,
    pub spacing: SpacingTokens,
    pub borders: BorderTokens,
    pub shadows: ShadowTokens,
}

impl DesignTokens {
    /// 以 CSS 自定义属性的形式输出全部 token，每行一条声明
    pub fn to_css_variables(&self) -> String {
        let declarations = [
            ("--color-primary", &self.colors.primary),
            ("--color-secondary", &self.colors.secondary),
            ("--color-accent", &self.colors.accent),
            ("--color-text", &self.colors.text),
            ("--color-background", &self.colors.background),
            ("--color-surface", &self.colors.surface),
            ("--color-muted", &self.colors.muted),
            ("--font-heading", &self.fonts.heading),
            ("--font-body", &self.fonts.body),
            ("--font-mono", &self.fonts.mono),
            ("--size-h1", &self.sizes.h1),
            ("--size-h2", &self.sizes.h2),
            ("--size-h3", &self.sizes.h3),
            ("--size-body", &self.sizes.body),
            ("--size-caption", &self.sizes.caption),
            ("--spacing-xs", &self.spacing.xs),
            ("--spacing-sm", &self.spacing.sm),
            ("--spacing-md", &self.spacing.md),
            ("--spacing-lg", &self.spacing.lg),
            ("--spacing-xl", &self.spacing.xl),
            ("--border-radius", &self.borders.radius),
            ("--border-width", &self.borders.width),
            ("--shadow-card", &self.shadows.card),
            ("--shadow-elevated", &self.shadows.elevated),
        ];

        declarations
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
