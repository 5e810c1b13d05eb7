//! 시계열에 추가되는 컬럼 이름

pub const MA_SHORT: &str = "MA_SHORT";
pub const MA_MEDIUM: &str = "MA_MEDIUM";
pub const MA_LONG: &str = "MA_LONG";
pub const MA_DIFF: &str = "MA_DIFF";
pub const MA_GOLDEN_CROSS: &str = "MA_GOLDEN_CROSS";
pub const MA_DEATH_CROSS: &str = "MA_DEATH_CROSS";

pub const RSI: &str = "RSI";
pub const RSI_OVERSOLD: &str = "RSI_OVERSOLD";
pub const RSI_OVERBOUGHT: &str = "RSI_OVERBOUGHT";

pub const MACD: &str = "MACD";
pub const MACD_SIGNAL: &str = "MACD_SIGNAL";
pub const MACD_HIST: &str = "MACD_HIST";
pub const MACD_DIFF: &str = "MACD_DIFF";
pub const MACD_GOLDEN_CROSS: &str = "MACD_GOLDEN_CROSS";
pub const MACD_DEATH_CROSS: &str = "MACD_DEATH_CROSS";

pub const KDJ_K: &str = "KDJ_K";
pub const KDJ_D: &str = "KDJ_D";
pub const KDJ_J: &str = "KDJ_J";
pub const KDJ_OVERSOLD: &str = "KDJ_OVERSOLD";
pub const KDJ_OVERBOUGHT: &str = "KDJ_OVERBOUGHT";
pub const KDJ_KD_GOLDEN_CROSS: &str = "KDJ_KD_GOLDEN_CROSS";
pub const KDJ_KD_DEATH_CROSS: &str = "KDJ_KD_DEATH_CROSS";
