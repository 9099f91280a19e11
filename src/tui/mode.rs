use ratatui::style::Color;

/// Which panel receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Typing a message
    #[default]
    Composer,
    /// Browsing the conversation list
    Conversations,
    /// Browsing the sample questions
    Templates,
}

impl Focus {
    /// Next panel in Tab order
    pub fn cycle(&self) -> Self {
        match self {
            Self::Composer => Self::Conversations,
            Self::Conversations => Self::Templates,
            Self::Templates => Self::Composer,
        }
    }

    /// Previous panel in Tab order
    pub fn cycle_reverse(&self) -> Self {
        match self {
            Self::Composer => Self::Templates,
            Self::Templates => Self::Conversations,
            Self::Conversations => Self::Composer,
        }
    }

    /// Next panel that is actually on screen
    pub fn cycle_visible(&self, show_sidebar: bool, show_templates: bool) -> Self {
        Self::step_visible(*self, Self::cycle, show_sidebar, show_templates)
    }

    pub fn cycle_visible_reverse(&self, show_sidebar: bool, show_templates: bool) -> Self {
        Self::step_visible(*self, Self::cycle_reverse, show_sidebar, show_templates)
    }

    fn step_visible(
        from: Self,
        step: fn(&Self) -> Self,
        show_sidebar: bool,
        show_templates: bool,
    ) -> Self {
        let mut next = step(&from);
        while !next.is_visible(show_sidebar, show_templates) {
            next = step(&next);
        }
        next
    }

    pub fn is_visible(&self, show_sidebar: bool, show_templates: bool) -> bool {
        match self {
            Self::Composer => true,
            Self::Conversations => show_sidebar,
            Self::Templates => show_sidebar && show_templates,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Composer => "CHAT",
            Self::Conversations => "CONVERSACIONES",
            Self::Templates => "PLANTILLAS",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Composer => Color::Green,
            Self::Conversations => Color::Cyan,
            Self::Templates => Color::Yellow,
        }
    }

    /// Key hint shown in the status bar
    pub fn keyboard_hint(&self) -> &str {
        match self {
            Self::Composer => "Enter: send • Shift+Enter: newline • Tab: panels",
            Self::Conversations => "↑↓: move • Enter: open • Ctrl+N: new • Ctrl+D: delete",
            Self::Templates => "↑↓: move • Enter: use template",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycling() {
        let mut focus = Focus::Composer;

        focus = focus.cycle();
        assert_eq!(focus, Focus::Conversations);

        focus = focus.cycle();
        assert_eq!(focus, Focus::Templates);

        focus = focus.cycle();
        assert_eq!(focus, Focus::Composer);
    }

    #[test]
    fn test_focus_cycling_reverse() {
        let mut focus = Focus::Composer;

        focus = focus.cycle_reverse();
        assert_eq!(focus, Focus::Templates);

        focus = focus.cycle_reverse();
        assert_eq!(focus, Focus::Conversations);

        focus = focus.cycle_reverse();
        assert_eq!(focus, Focus::Composer);
    }

    #[test]
    fn test_hidden_panels_are_skipped() {
        assert_eq!(Focus::Composer.cycle_visible(true, false), Focus::Conversations);
        assert_eq!(Focus::Conversations.cycle_visible(true, false), Focus::Composer);
        assert_eq!(Focus::Composer.cycle_visible(false, true), Focus::Composer);
        assert_eq!(Focus::Composer.cycle_visible_reverse(true, true), Focus::Templates);
    }
}
