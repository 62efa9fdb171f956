//! Frame description built from a session snapshot
//!
//! Backends draw a [`Frame`] in field order: `world`, `mask`, `above_mask`,
//! `overlay_alpha`, `hud`, `text`, then `fade_alpha`.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::STORY_TEXTS;
use crate::sim::{Arena, GameSession, Rect, Screen, VisibilityMode};

/// Light mask: darkness alpha 245 with a hole around the player
pub const LIMITED_MASK_ALPHA: f32 = 245.0;
/// Blind mask: everything but the player and stars
pub const BLIND_MASK_ALPHA: f32 = 240.0;
/// Dimming behind the win / lose message
pub const END_OVERLAY_ALPHA: f32 = 160.0;

/// Characters per story line
const WRAP_COLUMNS: usize = 40;
/// Segments used when tessellating the light hole
const LIGHT_SEGMENTS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Background,
    Rock,
    Lava,
    Star,
    Astronaut,
    Heart,
    Button,
}

impl Sprite {
    /// Flat color for backends without textures
    pub fn color(&self) -> [f32; 4] {
        match self {
            Sprite::Background => colors::BACKGROUND,
            Sprite::Rock => colors::ROCK,
            Sprite::Lava => colors::LAVA,
            Sprite::Star => colors::STAR,
            Sprite::Astronaut => colors::ASTRONAUT,
            Sprite::Heart => colors::HEART,
            Sprite::Button => colors::BUTTON,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    pub sprite: Sprite,
    pub rect: Rect,
}

impl SpriteQuad {
    fn new(sprite: Sprite, rect: Rect) -> Self {
        Self { sprite, rect }
    }
}

/// Which of the three loaded fonts to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Title,
    Body,
    Tiny,
}

/// One line of text, horizontally centered on `center_x`
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font: FontSize,
    pub color: [f32; 4],
    pub center_x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub center: Vec2,
    pub radius: f32,
}

/// Darkness laid over the world layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mask {
    /// 0-255
    pub alpha: f32,
    pub light: Option<Light>,
}

/// In-game indicators
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub lives: u8,
    pub max_lives: u8,
    /// False during the dark half of a heart flash
    pub heart_visible: bool,
    pub elapsed_secs: f64,
    pub collected: usize,
    pub goal: usize,
}

impl Hud {
    pub fn lives_text(&self) -> String {
        format!("{}/{}", self.lives, self.max_lives)
    }

    pub fn time_text(&self) -> String {
        format!("{:.1}s", self.elapsed_secs)
    }

    pub fn stars_text(&self) -> String {
        format!("{}/{}", self.collected, self.goal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub screen: Screen,
    pub size: Vec2,
    pub fullscreen: bool,
    /// Drawn first, under the mask
    pub world: Vec<SpriteQuad>,
    pub mask: Option<Mask>,
    /// Drawn over the mask
    pub above_mask: Vec<SpriteQuad>,
    pub overlay_alpha: Option<f32>,
    pub hud: Option<Hud>,
    pub text: Vec<TextLine>,
    /// Story fade-in, 0 when clear
    pub fade_alpha: f32,
}

impl Frame {
    fn empty(screen: Screen, size: Vec2, fullscreen: bool) -> Self {
        Self {
            screen,
            size,
            fullscreen,
            world: Vec::new(),
            mask: None,
            above_mask: Vec::new(),
            overlay_alpha: None,
            hud: None,
            text: Vec::new(),
            fade_alpha: 0.0,
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.x, self.size.y)
    }

    fn line(&mut self, text: impl Into<String>, font: FontSize, color: [f32; 4], y: f32) {
        self.text.push(TextLine {
            text: text.into(),
            font,
            color,
            center_x: self.size.x / 2.0,
            y,
        });
    }

    /// Every sprite in draw order
    pub fn sprites(&self) -> impl Iterator<Item = &SpriteQuad> {
        self.world.iter().chain(&self.above_mask)
    }

    pub fn count(&self, sprite: Sprite) -> usize {
        self.sprites().filter(|q| q.sprite == sprite).count()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.text.iter().any(|l| l.text.contains(needle))
    }

    /// Flat-colored triangles for the whole frame, in draw order (text excluded)
    pub fn vertices(&self) -> Vec<Vertex> {
        let bounds = self.bounds();
        let mut out = Vec::new();

        for q in &self.world {
            out.extend(shapes::quad(&q.rect, q.sprite.color()));
        }
        if let Some(mask) = self.mask {
            let color = colors::black(mask.alpha);
            match mask.light {
                Some(light) => out.extend(shapes::mask_with_light(
                    &bounds,
                    light.center,
                    light.radius,
                    color,
                    LIGHT_SEGMENTS,
                )),
                None => out.extend(shapes::quad(&bounds, color)),
            }
        }
        for q in &self.above_mask {
            out.extend(shapes::quad(&q.rect, q.sprite.color()));
        }
        for alpha in [self.overlay_alpha, Some(self.fade_alpha).filter(|a| *a > 0.0)]
            .into_iter()
            .flatten()
        {
            out.extend(shapes::quad(&bounds, colors::black(alpha)));
        }
        out
    }

    /// Vertex buffer contents for upload
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices()).to_vec()
    }
}

/// Describe what the session looks like right now
pub fn build_frame(session: &GameSession) -> Frame {
    let size = session.settings.arena_size();
    let mut frame = Frame::empty(session.screen, size, session.fullscreen);

    match session.screen {
        Screen::Story { page } => story_page(&mut frame, page, session.fade.alpha),
        Screen::ModeSelect => mode_select(&mut frame, session),
        Screen::Instructions => instructions(&mut frame),
        Screen::Playing => {
            if let Some(arena) = session.arena.as_ref() {
                playing(&mut frame, session, arena);
            }
        }
        Screen::Won | Screen::Lost => {
            if let Some(arena) = session.arena.as_ref() {
                let bounds = frame.bounds();
                frame.world.push(SpriteQuad::new(Sprite::Background, bounds));
                frame.world.extend(entity_quads(arena, true));
            }
            frame.overlay_alpha = Some(END_OVERLAY_ALPHA);
            end_message(&mut frame, session);
        }
    }
    frame
}

fn story_page(frame: &mut Frame, page: usize, fade_alpha: f32) {
    let (w, h) = (frame.size.x, frame.size.y);
    let player = crate::consts::PLAYER_SIZE;

    match page {
        0 => {
            let astronaut = Rect::new(w / 2.0 - player, h / 3.0 - player, player * 2.0, player * 2.0);
            frame.world.push(SpriteQuad::new(Sprite::Astronaut, astronaut));
            for x in [astronaut.pos.x - 100.0, astronaut.max().x + 20.0] {
                frame
                    .world
                    .push(SpriteQuad::new(Sprite::Star, Rect::new(x, astronaut.pos.y, 80.0, 80.0)));
            }
        }
        1 => {
            for i in 0..5 {
                let lava = Rect::new(w / 4.0 + i as f32 * 100.0, h / 3.0, 60.0, 60.0);
                frame.world.push(SpriteQuad::new(Sprite::Lava, lava));
            }
        }
        _ => {
            frame
                .world
                .push(SpriteQuad::new(Sprite::Background, Rect::new(w / 2.0 - 150.0, h / 4.0, 300.0, 300.0)));
            frame
                .world
                .push(SpriteQuad::new(Sprite::Astronaut, Rect::new(w / 2.0 - player, h / 3.0, player, player)));
            for i in 0..3 {
                let x = w / 4.0 + i as f32 * 200.0;
                frame
                    .world
                    .push(SpriteQuad::new(Sprite::Star, Rect::new(x, h / 3.0 - 50.0, 60.0, 60.0)));
            }
        }
    }

    let text = STORY_TEXTS.get(page).copied().unwrap_or_default();
    for (i, line) in wrap(text, WRAP_COLUMNS).into_iter().enumerate() {
        frame.line(line, FontSize::Body, colors::TEXT, h / 2.0 + i as f32 * 30.0);
    }
    frame.line("Press SPACE to continue", FontSize::Tiny, colors::TEXT, h - 100.0);
    frame.fade_alpha = fade_alpha;
}

fn mode_select(frame: &mut Frame, session: &GameSession) {
    let bounds = frame.bounds();
    frame.world.push(SpriteQuad::new(Sprite::Background, bounds));
    frame.line("Moon Odyssey", FontSize::Title, colors::TEXT, 100.0);
    frame.line("Created by Estella Gu", FontSize::Tiny, colors::TEXT, 160.0);

    let (button_w, button_h) = (400.0, 80.0);
    for (i, mode) in VisibilityMode::ALL.into_iter().enumerate() {
        let y = 250.0 + i as f32 * 100.0;
        let button = Rect::new(bounds.center().x - button_w / 2.0, y, button_w, button_h);
        frame.world.push(SpriteQuad::new(Sprite::Button, button));
        frame.line(
            format!("{} (press {})", mode.label(), i + 1),
            FontSize::Body,
            colors::TEXT,
            button.center().y,
        );
    }

    for (i, mode) in VisibilityMode::ALL.into_iter().enumerate() {
        let y = 450.0 + i as f32 * 30.0;
        frame.line(session.best_times.describe(mode), FontSize::Tiny, colors::BEST_TIME, y);
    }
    frame.line("Press H for instructions", FontSize::Tiny, colors::TEXT, 530.0);
}

fn instructions(frame: &mut Frame) {
    let bounds = frame.bounds();
    frame.world.push(SpriteQuad::new(Sprite::Background, bounds));
    frame.overlay_alpha = Some(END_OVERLAY_ALPHA);
    frame.line("How to Play", FontSize::Title, colors::TEXT, 80.0);
    let lines = [
        "Move with the arrow keys or WASD",
        "Collect every star to win",
        "Every step turns the ground behind you to lava",
        "Rocks block your way",
        "Limited Light: you only see around you",
        "No Light: only you and the stars show",
        "F11 toggles fullscreen",
    ];
    for (i, text) in lines.into_iter().enumerate() {
        frame.line(text, FontSize::Body, colors::TEXT, 180.0 + i as f32 * 40.0);
    }
    frame.line("Press SPACE to go back", FontSize::Tiny, colors::TEXT, bounds.max().y - 60.0);
}

fn playing(frame: &mut Frame, session: &GameSession, arena: &Arena) {
    let bounds = frame.bounds();
    frame.world.push(SpriteQuad::new(Sprite::Background, bounds));

    match session.mode.unwrap_or(VisibilityMode::Limited) {
        VisibilityMode::Limited => {
            frame.world.extend(entity_quads(arena, true));
            frame.mask = Some(Mask {
                alpha: LIMITED_MASK_ALPHA,
                light: Some(Light {
                    center: arena.actor.center(),
                    radius: session.settings.light_radius,
                }),
            });
        }
        VisibilityMode::Blind => {
            frame.mask = Some(Mask {
                alpha: BLIND_MASK_ALPHA,
                light: None,
            });
            frame.above_mask.extend(entity_quads(arena, false));
        }
    }

    if session.heart_visible() {
        for i in 0..arena.actor.lives {
            let heart = Rect::new(10.0 + i as f32 * 35.0, 10.0, 30.0, 30.0);
            frame.above_mask.push(SpriteQuad::new(Sprite::Heart, heart));
        }
    }

    frame.hud = Some(Hud {
        lives: arena.actor.lives,
        max_lives: session.settings.lives,
        heart_visible: session.heart_visible(),
        elapsed_secs: session.elapsed_secs(),
        collected: arena.collected,
        goal: arena.goal,
    });
}

/// Rocks and lava (optional), stars, then the player on top
fn entity_quads(arena: &Arena, with_terrain: bool) -> Vec<SpriteQuad> {
    let mut quads = Vec::new();
    if with_terrain {
        quads.extend(arena.obstacles.iter().map(|o| SpriteQuad::new(Sprite::Rock, o.visual)));
        quads.extend(arena.actor.trail.iter().map(|t| SpriteQuad::new(Sprite::Lava, *t)));
    }
    quads.extend(arena.active_collectibles().map(|c| SpriteQuad::new(Sprite::Star, c.visual)));
    quads.push(SpriteQuad::new(Sprite::Astronaut, arena.actor.rect));
    quads
}

fn end_message(frame: &mut Frame, session: &GameSession) {
    let h = frame.size.y;
    let (title, subtitle, color) = if session.screen == Screen::Won {
        ("You Win!", "Congrats, you've saved humanity!", colors::TEXT_WIN)
    } else {
        ("Game Over!", "You are your own enemy!", colors::TEXT_LOSE)
    };
    frame.line(title, FontSize::Title, color, h / 3.0);
    frame.line(subtitle, FontSize::Body, color, h / 2.0);

    if let Some(result) = session.last_result.filter(|r| r.won) {
        let mut time = format!("Time: {:.1}s", result.secs);
        if result.new_best {
            time.push_str(" - New best!");
        }
        frame.line(time, FontSize::Tiny, colors::TEXT, h / 2.0 + 40.0);
    }

    let button = Rect::new(frame.size.x / 2.0 - 100.0, h * 2.0 / 3.0, 200.0, 50.0);
    frame.world.push(SpriteQuad::new(Sprite::Button, button));
    frame.line("Restart (click or press R)", FontSize::Body, colors::TEXT, button.center().y);
}

/// Greedy word wrap
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::StateEvent;

    fn playing_session(mode: VisibilityMode) -> GameSession {
        let mut s = GameSession::new(Settings::default(), 7);
        for _ in 0..s.story_pages() {
            s.apply(StateEvent::Advance, 0).unwrap();
        }
        s.apply(StateEvent::SelectMode(mode), 0).unwrap();
        // Some lava on the ground
        let arena = s.arena.as_mut().unwrap();
        arena.actor.trail = (0..4).map(|i| Rect::new(i as f32 * 40.0, 0.0, 30.0, 30.0)).collect();
        s.now_ms = 320;
        s
    }

    #[test]
    fn test_limited_draws_everything_under_light_mask() {
        let s = playing_session(VisibilityMode::Limited);
        let arena = s.arena.as_ref().unwrap();
        let frame = build_frame(&s);

        assert_eq!(frame.count(Sprite::Rock), arena.obstacles.len());
        assert_eq!(frame.count(Sprite::Lava), arena.actor.trail.len());
        assert_eq!(frame.count(Sprite::Star), 3);
        assert!(frame.above_mask.iter().all(|q| q.sprite == Sprite::Heart));
        assert_eq!(frame.count(Sprite::Heart), 1);

        let mask = frame.mask.unwrap();
        assert_eq!(mask.alpha, 245.0);
        assert_eq!(
            mask.light,
            Some(Light {
                center: arena.actor.center(),
                radius: 100.0
            })
        );
    }

    #[test]
    fn test_blind_hides_rocks_and_lava() {
        let s = playing_session(VisibilityMode::Blind);
        let frame = build_frame(&s);

        assert_eq!(frame.count(Sprite::Rock), 0);
        assert_eq!(frame.count(Sprite::Lava), 0);
        assert_eq!(frame.mask.map(|m| (m.alpha, m.light)), Some((240.0, None)));
        assert!(frame.above_mask.iter().any(|q| q.sprite == Sprite::Astronaut));
        assert_eq!(frame.above_mask.iter().filter(|q| q.sprite == Sprite::Star).count(), 3);
    }

    #[test]
    fn test_hud_counts() {
        let s = playing_session(VisibilityMode::Limited);
        let hud = build_frame(&s).hud.unwrap();
        assert_eq!(hud.lives_text(), "1/1");
        assert_eq!(hud.stars_text(), "0/3");
        assert_eq!(hud.time_text(), "0.3s");
        assert!(hud.heart_visible);
    }

    #[test]
    fn test_mode_select_lists_best_times() {
        let mut s = GameSession::new(Settings::default(), 1);
        for _ in 0..s.story_pages() {
            s.apply(StateEvent::Advance, 0).unwrap();
        }
        s.best_times.record(VisibilityMode::Blind, 42.25);
        let frame = build_frame(&s);

        assert!(frame.has_text("Best NORMAL: No record"));
        assert!(frame.has_text("Best BLIND: 42.2s") || frame.has_text("Best BLIND: 42.3s"));
        assert!(frame.has_text("Limited Light (press 1)"));
        assert!(frame.mask.is_none());
    }

    #[test]
    fn test_end_screen_shows_all_with_overlay() {
        let mut s = playing_session(VisibilityMode::Blind);
        s.apply(StateEvent::LivesExhausted, 2000).unwrap();
        let frame = build_frame(&s);

        assert_eq!(frame.screen, Screen::Lost);
        assert!(frame.mask.is_none());
        assert_eq!(frame.overlay_alpha, Some(160.0));
        assert!(frame.count(Sprite::Lava) > 0);
        assert!(frame.has_text("Game Over!"));
        assert!(frame.has_text("Restart"));
    }

    #[test]
    fn test_story_page_wraps_and_fades() {
        let s = GameSession::new(Settings::default(), 1);
        let frame = build_frame(&s);

        assert_eq!(frame.fade_alpha, 255.0);
        assert!(frame.text.iter().all(|l| l.text.len() <= WRAP_COLUMNS || !l.text.contains(' ')));
        assert!(frame.has_text("astronaut"));
        assert!(frame.has_text("Press SPACE"));

        // Fade quad is the last thing drawn
        let verts = frame.vertices();
        assert_eq!(verts.last().map(|v| v.color[3]), Some(1.0));
        assert_eq!(frame.vertex_bytes().len(), verts.len() * std::mem::size_of::<Vertex>());
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap("", 5), Vec::<String>::new());
    }
}
