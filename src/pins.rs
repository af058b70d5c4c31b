//! GPIO / peripheral pin assignments for the FloodWatch station board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Simulated sensors: joystick axes on ADC
// ---------------------------------------------------------------------------

/// Water level (joystick Y axis). ADC input 0.
pub const WATER_LEVEL_ADC_GPIO: u8 = 26;
pub const WATER_LEVEL_ADC_INPUT: u8 = 0;

/// Rainfall volume (joystick X axis). ADC input 1.
pub const RAINFALL_ADC_GPIO: u8 = 27;
pub const RAINFALL_ADC_INPUT: u8 = 1;

// ---------------------------------------------------------------------------
// RGB indicator (discrete LEDs on PWM slices)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: u8 = 13;
pub const LED_G_GPIO: u8 = 11;
pub const LED_B_GPIO: u8 = 12;

/// LED PWM wrap value. 8-bit brightness maps 1:1 onto duty counts.
pub const LED_PWM_WRAP: u16 = 255;

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: u8 = 21;

/// Tone PWM wrap value (125 MHz / clkdiv 125 / 12 500 = 80 Hz frame,
/// 10 kHz counter base).
pub const TONE_PWM_WRAP: u16 = 12_500;
pub const TONE_PWM_CLKDIV: f32 = 125.0;

// ---------------------------------------------------------------------------
// 5×5 WS2812 matrix (serial command stream)
// ---------------------------------------------------------------------------

pub const LED_MATRIX_GPIO: u8 = 7;

// ---------------------------------------------------------------------------
// OLED display (SSD1306 over I²C)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: u8 = 14;
pub const I2C_SCL_GPIO: u8 = 15;
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;
pub const DISPLAY_I2C_HZ: u32 = 400_000;
