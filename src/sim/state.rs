//! Game state and mode setup
//!
//! Everything a session needs between frames lives here, so the host can
//! drive it one `tick` at a time without any suspended control flow.

use serde::{Deserialize, Serialize};

use super::fixed::Fixed;
use super::physics::CharacterBody;
use super::scene::Animation;
use super::terrain::TerrainGenerator;
use super::tilemap::TileMap;
use crate::settings::{ConfigError, PhysicsParams, Settings};

/// Current mode of the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Attract screen: flat ground scrolling at the initial speed
    Title,
    /// Active run
    Playing,
    /// Run ended, scrolling stopped
    GameOver,
}

/// Something the host may want to react to (sound cues, UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Character left the ground; play the jump cue
    Jump,
    /// Character ran into a wall and stopped
    WallHit,
    /// Character came down on solid ground
    Landed,
    ModeChanged { from: Mode, to: Mode },
}

/// Complete session state (deterministic for a given settings + input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    settings: Settings,
    /// Fixed-point physics constants derived from `settings`
    params: PhysicsParams,
    pub mode: Mode,
    /// Frames advanced since the session started
    pub frame: u64,
    pub map: TileMap,
    /// Sub-tile horizontal scroll, always in `[0, tile)` between frames
    pub scroll_x: Fixed,
    /// Vertical scroll (unused, kept at zero)
    pub scroll_y: Fixed,
    pub body: CharacterBody,
    pub terrain: TerrainGenerator,
    pub animation: Animation,
}

impl GameState {
    /// Validate `settings` and start a session on the title screen
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let params = settings.physics_params();
        let terrain = TerrainGenerator::new(&settings.terrain)?;

        let mut state = Self {
            map: TileMap::new(settings.columns(), settings.rows()),
            settings,
            params,
            mode: Mode::Title,
            frame: 0,
            scroll_x: Fixed::ZERO,
            scroll_y: Fixed::ZERO,
            body: CharacterBody::new(&params),
            terrain,
            animation: Animation::default(),
        };
        state.goto_title();

        log::info!(
            "Session created: {}x{} tiles, seed {}",
            state.map.columns(),
            state.map.rows(),
            state.settings.terrain.seed
        );
        Ok(state)
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Full reset onto the title screen
    pub fn goto_title(&mut self) -> GameEvent {
        self.map.fill_flat(self.terrain.title_ground_height());
        self.scroll_x = Fixed::ZERO;
        self.scroll_y = Fixed::ZERO;
        self.body = CharacterBody::new(&self.params);
        self.terrain.reset();
        self.animation = Animation::default();
        self.set_mode(Mode::Title)
    }

    /// Start a run: flat ground under the character, terrain reseeded.
    ///
    /// Scroll offset carries over from the title screen so the ground does
    /// not jump under the character.
    pub fn enter_playing(&mut self) -> GameEvent {
        self.map.fill_flat(self.terrain.title_ground_height());
        self.body = CharacterBody::new(&self.params);
        self.terrain.reset();
        self.set_mode(Mode::Playing)
    }

    /// Stop the world
    pub fn enter_game_over(&mut self) -> GameEvent {
        self.body.speed_x = Fixed::ZERO;
        self.set_mode(Mode::GameOver)
    }

    fn set_mode(&mut self, to: Mode) -> GameEvent {
        let from = self.mode;
        self.mode = to;
        if from != to {
            log::info!("Mode {:?} -> {:?} at frame {}", from, to, self.frame);
        }
        GameEvent::ModeChanged { from, to }
    }

    /// Shift the grid one column per full tile of scroll.
    ///
    /// New columns come from the terrain generator while playing and are flat
    /// otherwise. Returns the number of columns shifted.
    pub fn wrap_scroll(&mut self) -> u32 {
        let tile = self.params.tile;
        let mut shifted = 0;
        while self.scroll_x >= tile {
            self.scroll_x -= tile;
            self.map.retire_left_column();
            let (ground_height, hole) = match self.mode {
                Mode::Playing => self.terrain.next_column(),
                Mode::Title | Mode::GameOver => (self.terrain.title_ground_height(), false),
            };
            self.map.append_right_column(ground_height, hole);
            shifted += 1;
        }
        if shifted > 0 {
            log::trace!(
                "Scrolled {} column(s), offset {:.2}px",
                shifted,
                self.scroll_x.to_f32()
            );
        }
        shifted
    }
}
