use engine::{Canvas, InputAction, InputSnapshot, Scene, SceneCommand};
use tracing::{debug, info};

use crate::core::{Direction, Session, Slide};

use super::button::{button_row, Button};
use super::render::{draw_frame, Frame};

const DIRECTION_BINDINGS: [(InputAction, Direction); 4] = [
    (InputAction::MoveLeft, Direction::Left),
    (InputAction::MoveRight, Direction::Right),
    (InputAction::MoveUp, Direction::Up),
    (InputAction::MoveDown, Direction::Down),
];

/// Drives one session from tick input. A move in flight advances one tick
/// per update and swallows input until it settles.
pub struct GameScene {
    session: Session,
    slide: Option<Slide>,
    restart_button: Button,
    quit_button: Button,
}

impl GameScene {
    pub fn new(session: Session) -> Self {
        let (canvas_width, _) = session.grid().layout().canvas_size();
        let (restart_button, quit_button) = button_row(canvas_width as i32);
        Self {
            session,
            slide: None,
            restart_button,
            quit_button,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    fn advance_slide(&mut self) {
        let Some(slide) = self.slide.as_mut() else {
            return;
        };
        slide.tick(self.session.grid_mut());
        if !slide.is_settled() {
            return;
        }
        if let Some(slide) = self.slide.take() {
            debug!(
                direction = slide.direction().as_str(),
                ticks = slide.ticks(),
                "slide_finished"
            );
            self.session.finish_move(&slide);
        }
    }

    fn pressed_direction(input: &InputSnapshot) -> Option<Direction> {
        DIRECTION_BINDINGS
            .iter()
            .find(|(action, _)| input.was_pressed(*action))
            .map(|(_, direction)| *direction)
    }
}

impl Scene for GameScene {
    fn load(&mut self) {
        info!(
            tiles = self.session.grid().len(),
            score = self.session.score(),
            "game_scene_loaded"
        );
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }

        let cursor = input.cursor_position_px();
        self.restart_button.update_hover(cursor);
        self.quit_button.update_hover(cursor);

        if self.slide.is_some() {
            self.advance_slide();
            return SceneCommand::None;
        }

        if input.left_click_pressed() {
            if self.restart_button.is_clicked(cursor) {
                self.session.restart();
                return SceneCommand::None;
            }
            if self.quit_button.is_clicked(cursor) {
                info!(reason = "quit_button", "quit_requested");
                return SceneCommand::Quit;
            }
        }

        if let Some(direction) = Self::pressed_direction(input) {
            self.slide = self.session.begin_move(direction);
            self.advance_slide();
        }
        SceneCommand::None
    }

    fn render(&self, canvas: &mut Canvas<'_>) {
        draw_frame(
            canvas,
            &Frame {
                grid: self.session.grid(),
                score: self.session.score(),
                game_over: self.session.is_game_over(),
                buttons: [&self.restart_button, &self.quit_button],
            },
        );
    }

    fn unload(&mut self) {
        self.slide = None;
        info!(
            score = self.session.score(),
            moves = self.session.moves(),
            best_tile = self.session.best_tile(),
            "game_scene_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        Some(format!(
            "2048 - Score: {} - Best: {}",
            self.session.score(),
            self.session.best_tile()
        ))
    }

    fn debug_lines(&self) -> Vec<String> {
        let slide = match &self.slide {
            Some(slide) => format!("{} tick {}", slide.direction().as_str(), slide.ticks()),
            None => "idle".to_string(),
        };
        vec![
            format!("Score: {}", self.session.score()),
            format!("Moves: {}", self.session.moves()),
            format!("Tiles: {}", self.session.grid().len()),
            format!("Slide: {slide}"),
            format!("Game over: {}", self.session.is_game_over()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use engine::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::core::{BoardLayout, Cell, Grid};

    const DT: f32 = 1.0 / 60.0;
    const RESTART_CENTER: Vec2 = Vec2 { x: 315.0, y: 110.0 };
    const QUIT_CENTER: Vec2 = Vec2 { x: 485.0, y: 110.0 };

    fn scene_with_rows(rows: [[u32; 4]; 4]) -> GameScene {
        let mut scene = GameScene::new(Session::new_game(
            BoardLayout::default(),
            StdRng::seed_from_u64(11),
        ));
        *scene.session_mut().grid_mut() = Grid::from_rows(BoardLayout::default(), rows);
        scene
    }

    fn press(action: InputAction) -> InputSnapshot {
        InputSnapshot::empty().with_action_pressed(action, true)
    }

    fn click(at: Vec2) -> InputSnapshot {
        InputSnapshot::empty()
            .with_cursor_position_px(Some(at))
            .with_left_click_pressed(true)
    }

    fn run_until_idle(scene: &mut GameScene) -> u32 {
        let mut updates = 0;
        while scene.is_sliding() {
            assert_eq!(scene.update(DT, &InputSnapshot::empty()), SceneCommand::None);
            updates += 1;
            assert!(updates < 100, "slide never settled");
        }
        updates
    }

    #[test]
    fn move_animates_over_several_updates_then_spawns() {
        let mut scene = scene_with_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);

        scene.update(DT, &press(InputAction::MoveLeft));
        assert!(scene.is_sliding());
        assert_eq!(scene.session().score(), 0);

        let remaining = run_until_idle(&mut scene);
        assert_eq!(remaining, 10);
        assert_eq!(scene.session().score(), 4);
        assert_eq!(scene.session().grid().value_at(Cell::new(0, 0)), Some(4));
        assert_eq!(scene.session().grid().len(), 2);
        assert_eq!(scene.session().moves(), 1);
    }

    #[test]
    fn input_during_slide_is_ignored() {
        let mut scene = scene_with_rows([[0, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);

        scene.update(DT, &press(InputAction::MoveLeft));
        scene.update(DT, &press(InputAction::MoveRight));
        scene.update(DT, &click(RESTART_CENTER));
        run_until_idle(&mut scene);

        assert_eq!(scene.session().moves(), 1);
        assert_eq!(scene.session().grid().value_at(Cell::new(0, 0)), Some(2));
    }

    #[test]
    fn unchanged_move_settles_without_spawn() {
        let mut scene = scene_with_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);

        scene.update(DT, &press(InputAction::MoveLeft));
        assert!(!scene.is_sliding());
        assert_eq!(scene.session().grid().len(), 2);
        assert_eq!(scene.session().moves(), 0);
    }

    #[test]
    fn quit_request_and_quit_button_stop_the_scene() {
        let mut scene = scene_with_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(
            scene.update(DT, &InputSnapshot::empty().with_quit_requested(true)),
            SceneCommand::Quit
        );
        assert_eq!(scene.update(DT, &click(QUIT_CENTER)), SceneCommand::Quit);
    }

    #[test]
    fn game_over_blocks_moves_until_restart() {
        let mut scene = scene_with_rows([
            [0, 16, 32, 8],
            [2, 4, 2, 16],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
        ]);
        scene.update(DT, &press(InputAction::MoveLeft));
        run_until_idle(&mut scene);
        assert!(scene.session().is_game_over());

        let board = scene.session().grid().to_rows();
        scene.update(DT, &press(InputAction::MoveDown));
        assert!(!scene.is_sliding());
        assert_eq!(scene.session().grid().to_rows(), board);

        scene.update(DT, &click(RESTART_CENTER));
        assert!(!scene.session().is_game_over());
        assert_eq!(scene.session().score(), 0);
        assert_eq!(scene.session().grid().len(), 2);
    }

    #[test]
    fn hover_tracks_cursor() {
        let mut scene = scene_with_rows([[0; 4]; 4]);
        scene.update(
            DT,
            &InputSnapshot::empty().with_cursor_position_px(Some(QUIT_CENTER)),
        );
        assert!(scene.quit_button.is_hovered());
        assert!(!scene.restart_button.is_hovered());

        scene.update(DT, &InputSnapshot::empty());
        assert!(!scene.quit_button.is_hovered());
    }

    #[test]
    fn title_reports_score_and_best_tile() {
        let scene = scene_with_rows([[2, 0, 0, 0], [0, 64, 0, 0], [0; 4], [0; 4]]);
        assert_eq!(
            scene.debug_title().as_deref(),
            Some("2048 - Score: 0 - Best: 64")
        );
        assert!(scene
            .debug_lines()
            .iter()
            .any(|line| line == "Slide: idle"));
    }
}
