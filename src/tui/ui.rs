use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ErrorBanner, MessageList, TitleBar};
use crate::tui::theme::Palette;

pub const KEY_HINTS: &str =
    "Enter send · Ctrl+J newline · Ctrl+L clear · Ctrl+T theme · Esc quit";

/// Draws the whole screen from `app`.
///
/// Nothing here changes `app`; the only writes go to view-local state in
/// `tui` (scroll position, composer props).
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let palette = Palette::for_theme(app.theme);
    let area = frame.area();
    frame.render_widget(Block::new().style(palette.base), area);

    tui.sync(app);
    let error_height = app
        .error
        .as_deref()
        .map_or(0, |message| ErrorBanner::calculate_height(message, area.width));
    let input_height = tui.input_box.calculate_height(area.width);

    let layout = Layout::vertical([
        Length(1),
        Min(0),
        Length(error_height),
        Length(input_height),
        Length(1),
    ]);
    let [title_area, main_area, error_area, input_area, hint_area] = layout.areas(area);

    TitleBar::new(app.date_header.as_deref(), app.loading, app.theme, palette)
        .render(frame, title_area);

    MessageList::new(&mut tui.message_list, app, palette).render(frame, main_area);

    if let Some(message) = app.error.as_deref() {
        ErrorBanner::new(message, palette).render(frame, error_area);
    }

    tui.input_box.render(frame, input_area);

    frame.render_widget(
        Paragraph::new(Line::from(KEY_HINTS)).style(palette.muted),
        hint_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ClientError;
    use crate::core::action::{Action, update};
    use crate::core::message::Message;
    use crate::test_support::test_app;
    use crate::tui::components::input_box::COMPOSER_BUSY_TITLE;
    use crate::tui::components::message_list::PLACEHOLDER_TEXT;
    use crate::tui::components::title_bar::LOADING_TEXT;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn render(app: &App, tui: &mut TuiState) -> Buffer {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn text_of(buffer: &Buffer) -> String {
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn empty_app_shows_placeholder_and_hints() {
        let app = test_app();
        let mut tui = TuiState::new();
        let screen = text_of(&render(&app, &mut tui));
        assert!(screen.contains(PLACEHOLDER_TEXT));
        assert!(screen.contains(KEY_HINTS));
        assert!(!screen.contains(LOADING_TEXT));
    }

    #[test]
    fn markup_in_messages_is_shown_literally() {
        let mut app = test_app();
        update(
            &mut app,
            Action::Init(vec![Message::bot(
                "<script>x</script>",
                "2024-01-01T12:00:00Z",
            )]),
        );
        let mut tui = TuiState::new();
        let screen = text_of(&render(&app, &mut tui));
        assert!(screen.contains("<script>x</script>"));
        assert!(screen.contains("Monday, Jan 01, 2024"));
        assert!(!screen.contains(PLACEHOLDER_TEXT));
    }

    #[test]
    fn sending_shows_loading_and_disables_composer() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".to_string()));
        let mut tui = TuiState::new();
        let screen = text_of(&render(&app, &mut tui));
        assert!(screen.contains("hello"));
        assert!(screen.contains(LOADING_TEXT));
        assert!(screen.contains(COMPOSER_BUSY_TITLE));
        assert!(tui.input_box.disabled);
    }

    #[test]
    fn repeated_loading_renders_identically() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".to_string()));
        let mut tui = TuiState::new();
        let first = render(&app, &mut tui);

        app.set_loading(true);
        let second = render(&app, &mut tui);
        assert_eq!(first, second);
    }

    #[test]
    fn error_reply_shows_banner() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello".to_string()));
        update(
            &mut app,
            Action::ReplyReceived(Err(ClientError::Server {
                status: 500,
                message: "Server exploded".to_string(),
            })),
        );
        let mut tui = TuiState::new();
        let screen = text_of(&render(&app, &mut tui));
        assert!(screen.contains("Server exploded"));
        assert!(!screen.contains(LOADING_TEXT));
        assert!(!tui.input_box.disabled);
    }
}
