use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// RGBA colour as the host packs it (0xRRGGBBAA)
pub type Colour = u32;

/// Position or rotation triple in world space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(self, other: Self) -> f32 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl From<(f32, f32, f32)> for Vec3 {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Self { x, y, z }
    }
}

/// Text draw fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[repr(i32)]
pub enum Font {
    #[default]
    SanAndreas = 0,
    Clear = 1,
    CapitalClear = 2,
    Gta = 3,
    Sprite = 4,
    /// Renders a 3D model; the preview attributes only apply with this font
    ModelPreview = 5,
}

impl Font {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Text draw alignment. The host numbers these from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[repr(i32)]
pub enum TextAlignment {
    #[default]
    Left = 1,
    Center = 2,
    Right = 3,
}

impl TextAlignment {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[repr(i32)]
pub enum DialogStyle {
    #[default]
    MessageBox = 0,
    Input = 1,
    List = 2,
    Password = 3,
    Tablist = 4,
    TablistHeaders = 5,
}

impl DialogStyle {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Player state as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    None,
    OnFoot,
    Driver,
    Passenger,
    ExitVehicle,
    EnterVehicleDriver,
    EnterVehiclePassenger,
    Wasted,
    Spawned,
    Spectating,
    Unknown(i32),
}

impl PlayerState {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PlayerState::None,
            1 => PlayerState::OnFoot,
            2 => PlayerState::Driver,
            3 => PlayerState::Passenger,
            4 => PlayerState::ExitVehicle,
            5 => PlayerState::EnterVehicleDriver,
            6 => PlayerState::EnterVehiclePassenger,
            7 => PlayerState::Wasted,
            8 => PlayerState::Spawned,
            9 => PlayerState::Spectating,
            other => PlayerState::Unknown(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            PlayerState::None => 0,
            PlayerState::OnFoot => 1,
            PlayerState::Driver => 2,
            PlayerState::Passenger => 3,
            PlayerState::ExitVehicle => 4,
            PlayerState::EnterVehicleDriver => 5,
            PlayerState::EnterVehiclePassenger => 6,
            PlayerState::Wasted => 7,
            PlayerState::Spawned => 8,
            PlayerState::Spectating => 9,
            PlayerState::Unknown(code) => code,
        }
    }

    pub fn in_vehicle(self) -> bool {
        matches!(self, PlayerState::Driver | PlayerState::Passenger)
    }
}

/// The four dances the client knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DanceStyle {
    One,
    Two,
    Three,
    Four,
}

/// Special actions a player can be put into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAction {
    None,
    Duck,
    UseJetpack,
    EnterVehicle,
    ExitVehicle,
    Dance(DanceStyle),
    HandsUp,
    UseCellphone,
    Sitting,
    StopUseCellphone,
    DrinkBeer,
    SmokeCiggy,
    DrinkWine,
    DrinkSprunk,
    Cuffed,
    Carry,
    Other(i32),
}

impl SpecialAction {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => SpecialAction::None,
            1 => SpecialAction::Duck,
            2 => SpecialAction::UseJetpack,
            3 => SpecialAction::EnterVehicle,
            4 => SpecialAction::ExitVehicle,
            5 => SpecialAction::Dance(DanceStyle::One),
            6 => SpecialAction::Dance(DanceStyle::Two),
            7 => SpecialAction::Dance(DanceStyle::Three),
            8 => SpecialAction::Dance(DanceStyle::Four),
            10 => SpecialAction::HandsUp,
            11 => SpecialAction::UseCellphone,
            12 => SpecialAction::Sitting,
            13 => SpecialAction::StopUseCellphone,
            20 => SpecialAction::DrinkBeer,
            21 => SpecialAction::SmokeCiggy,
            22 => SpecialAction::DrinkWine,
            23 => SpecialAction::DrinkSprunk,
            24 => SpecialAction::Cuffed,
            25 => SpecialAction::Carry,
            other => SpecialAction::Other(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            SpecialAction::None => 0,
            SpecialAction::Duck => 1,
            SpecialAction::UseJetpack => 2,
            SpecialAction::EnterVehicle => 3,
            SpecialAction::ExitVehicle => 4,
            SpecialAction::Dance(DanceStyle::One) => 5,
            SpecialAction::Dance(DanceStyle::Two) => 6,
            SpecialAction::Dance(DanceStyle::Three) => 7,
            SpecialAction::Dance(DanceStyle::Four) => 8,
            SpecialAction::HandsUp => 10,
            SpecialAction::UseCellphone => 11,
            SpecialAction::Sitting => 12,
            SpecialAction::StopUseCellphone => 13,
            SpecialAction::DrinkBeer => 20,
            SpecialAction::SmokeCiggy => 21,
            SpecialAction::DrinkWine => 22,
            SpecialAction::DrinkSprunk => 23,
            SpecialAction::Cuffed => 24,
            SpecialAction::Carry => 25,
            SpecialAction::Other(code) => code,
        }
    }
}

bitflags! {
    /// Playback switches for [`Animation`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AnimationFlags: u8 {
        const LOOP = 0b0001;
        const LOCK_X = 0b0010;
        const LOCK_Y = 0b0100;
        const FREEZE = 0b1000;
    }
}

/// Animation to play on a player
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub library: String,
    pub name: String,
    /// Playback speed
    pub delta: f32,
    pub flags: AnimationFlags,
    /// Duration in milliseconds, 0 to play until stopped
    pub time: i32,
    pub force_sync: bool,
}

impl Animation {
    pub fn new(library: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            name: name.into(),
            delta: 4.1,
            flags: AnimationFlags::empty(),
            time: 0,
            force_sync: false,
        }
    }

    pub fn with_flags(mut self, flags: AnimationFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_time(mut self, time: i32) -> Self {
        self.time = time;
        self
    }

    pub fn with_force_sync(mut self, force_sync: bool) -> Self {
        self.force_sync = force_sync;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSlot {
    pub weapon: i32,
    pub ammo: i32,
}

/// Where and how a player spawns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnInfo {
    pub team: i32,
    pub skin: i32,
    pub position: Vec3,
    pub rotation: f32,
    pub weapons: [WeaponSlot; 3],
}

/// A modal dialog shown to one player
#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub id: i32,
    pub style: DialogStyle,
    pub caption: String,
    pub body: String,
    pub button1: String,
    /// Empty for a single-button dialog
    pub button2: String,
}

impl Dialog {
    pub fn new(
        id: i32,
        style: DialogStyle,
        caption: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            style,
            caption: caption.into(),
            body: body.into(),
            button1: "OK".to_string(),
            button2: String::new(),
        }
    }

    pub fn buttons(mut self, button1: impl Into<String>, button2: impl Into<String>) -> Self {
        self.button1 = button1.into();
        self.button2 = button2.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_state_round_trips_unknown_codes() {
        assert_eq!(PlayerState::from_code(2), PlayerState::Driver);
        assert!(PlayerState::from_code(3).in_vehicle());
        assert_eq!(PlayerState::from_code(42), PlayerState::Unknown(42));
        assert_eq!(PlayerState::Unknown(42).code(), 42);
    }

    #[test]
    fn test_special_action_dance_styles() {
        assert_eq!(SpecialAction::from_code(5), SpecialAction::Dance(DanceStyle::One));
        assert_eq!(SpecialAction::from_code(8), SpecialAction::Dance(DanceStyle::Four));
        assert_eq!(SpecialAction::Dance(DanceStyle::Three).code(), 7);
        for code in 0..=30 {
            assert_eq!(SpecialAction::from_code(code).code(), code);
        }
        assert_eq!(SpecialAction::from_code(68), SpecialAction::Other(68));
    }

    #[test]
    fn test_alignment_codes_start_at_one() {
        assert_eq!(TextAlignment::default(), TextAlignment::Left);
        assert_eq!(TextAlignment::Left.code(), 1);
        assert_eq!(TextAlignment::Center.code(), 2);
        assert_eq!(TextAlignment::Right.code(), 3);
    }

    #[test]
    fn test_dialog_builder() {
        let dialog = Dialog::new(1, DialogStyle::Input, "Login", "Password:").buttons("Login", "Quit");
        assert_eq!(dialog.button1, "Login");
        assert_eq!(dialog.button2, "Quit");
        assert_eq!(dialog.style.code(), 1);
    }
}
