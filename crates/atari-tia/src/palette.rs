//! NTSC colour palette.
//!
//! The TIA colour registers hold a 4-bit hue in D7-D4 and a 3-bit luminance
//! in D3-D1. D0 is not wired, so there are 128 distinct colours.

/// ARGB colours indexed by `colour >> 1`.
pub const NTSC_PALETTE: [u32; 128] = [
    // Hue 0: grey
    0xFF00_0000, 0xFF40_4040, 0xFF6C_6C6C, 0xFF90_9090, 0xFFB0_B0B0, 0xFFC8_C8C8, 0xFFDC_DCDC,
    0xFFEC_ECEC,
    // Hue 1: gold
    0xFF44_4400, 0xFF64_6410, 0xFF84_8424, 0xFFA0_A034, 0xFFB8_B840, 0xFFD0_D050, 0xFFE8_E85C,
    0xFFFC_FC68,
    // Hue 2: orange
    0xFF70_2800, 0xFF84_4414, 0xFF98_5C28, 0xFFAC_783C, 0xFFBC_8C4C, 0xFFCC_A05C, 0xFFDC_B468,
    0xFFEC_C878,
    // Hue 3: red-orange
    0xFF84_1800, 0xFF98_3418, 0xFFAC_5030, 0xFFC0_6848, 0xFFD0_805C, 0xFFE0_9470, 0xFFEC_A880,
    0xFFFC_BC94,
    // Hue 4: pink
    0xFF88_0000, 0xFF9C_2020, 0xFFB0_3C3C, 0xFFC0_5858, 0xFFD0_7070, 0xFFE0_8888, 0xFFEC_A0A0,
    0xFFFC_B4B4,
    // Hue 5: purple
    0xFF78_005C, 0xFF8C_2074, 0xFFA0_3C88, 0xFFB0_589C, 0xFFC0_70B0, 0xFFD0_84C0, 0xFFDC_9CD0,
    0xFFEC_B0E0,
    // Hue 6: purple-blue
    0xFF48_0078, 0xFF60_2090, 0xFF78_3CA4, 0xFF8C_58B8, 0xFFA0_70CC, 0xFFB4_84DC, 0xFFC4_9CEC,
    0xFFD4_B0FC,
    // Hue 7: blue
    0xFF14_0084, 0xFF30_2098, 0xFF4C_3CAC, 0xFF68_58C0, 0xFF7C_70D0, 0xFF94_88E0, 0xFFA8_A0EC,
    0xFFBC_B4FC,
    // Hue 8: blue
    0xFF00_0088, 0xFF1C_209C, 0xFF38_40B0, 0xFF50_5CC0, 0xFF68_74D0, 0xFF7C_8CE0, 0xFF90_A4EC,
    0xFFA4_B8FC,
    // Hue 9: light blue
    0xFF00_187C, 0xFF1C_3890, 0xFF38_54A8, 0xFF50_70BC, 0xFF68_88CC, 0xFF7C_9CDC, 0xFF90_B4EC,
    0xFFA4_C8FC,
    // Hue 10: turquoise
    0xFF00_2C5C, 0xFF1C_4C78, 0xFF38_6890, 0xFF50_84AC, 0xFF68_9CC0, 0xFF7C_B4D4, 0xFF90_CCE8,
    0xFFA4_E0FC,
    // Hue 11: green-blue
    0xFF00_3C2C, 0xFF1C_5C48, 0xFF38_7C64, 0xFF50_9C80, 0xFF68_B494, 0xFF7C_D0AC, 0xFF90_E4C0,
    0xFFA4_FCD4,
    // Hue 12: green
    0xFF00_3C00, 0xFF20_5C20, 0xFF40_7C40, 0xFF5C_9C5C, 0xFF74_B474, 0xFF8C_D08C, 0xFFA4_E4A4,
    0xFFB8_FCB8,
    // Hue 13: yellow-green
    0xFF14_3800, 0xFF34_5C1C, 0xFF50_7C38, 0xFF6C_9850, 0xFF84_B468, 0xFF9C_CC7C, 0xFFB4_E490,
    0xFFC8_FCA4,
    // Hue 14: orange-green
    0xFF2C_3000, 0xFF4C_501C, 0xFF68_7034, 0xFF84_8C4C, 0xFF9C_A864, 0xFFB4_C078, 0xFFCC_D488,
    0xFFE0_EC9C,
    // Hue 15: light orange
    0xFF44_2800, 0xFF64_4818, 0xFF84_6830, 0xFFA0_8444, 0xFFB8_9C58, 0xFFD0_B46C, 0xFFE8_CC7C,
    0xFFFC_E08C,
];

/// ARGB value for a TIA colour register value.
#[must_use]
pub fn ntsc_argb(colour: u8) -> u32 {
    NTSC_PALETTE[usize::from(colour >> 1)]
}
