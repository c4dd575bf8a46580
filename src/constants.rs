/// SM-2 回忆质量评分：完全忘记
pub const QUALITY_AGAIN: u8 = 0;

/// SM-2 回忆质量评分：想起来但很吃力
pub const QUALITY_HARD: u8 = 3;

/// SM-2 回忆质量评分：正常想起
pub const QUALITY_GOOD: u8 = 4;

/// SM-2 回忆质量评分：轻松想起
pub const QUALITY_EASY: u8 = 5;

/// 低于此评分视为回忆失败（repetitions 归零）
pub const QUALITY_PASS_THRESHOLD: u8 = 3;

/// 难度系数下限
pub const MIN_EASINESS: f64 = 1.3;

/// 新词默认难度系数
pub const DEFAULT_EASINESS: f64 = 2.5;

/// 连续打卡里程碑（天数）
pub const STREAK_MILESTONES: &[u32] = &[3, 7, 14, 30, 60, 100];

/// 每个里程碑的奖励 XP，与 STREAK_MILESTONES 一一对应
pub const STREAK_MILESTONE_BONUS_XP: &[u32] = &[15, 30, 50, 100, 150, 300];

/// 每连续打卡 7 天奖励一次冻结
pub const STREAK_FREEZE_EVERY: u32 = 7;

/// 等级上限
pub const MAX_LEVEL: u32 = 50;

/// 可选的每日 XP 目标集合
pub const DAILY_XP_GOALS: &[u32] = &[10, 20, 30, 50];

/// 默认每日 XP 目标
pub const DEFAULT_DAILY_XP_GOAL: u32 = 20;

/// 舒适度自评下限
pub const MIN_COMFORT_LEVEL: u8 = 1;

/// 舒适度自评上限
pub const MAX_COMFORT_LEVEL: u8 = 5;

/// 掌握判定：最少重复次数
pub const MASTERY_MIN_REPETITIONS: u32 = 5;

/// 掌握判定：正确率阈值
pub const MASTERY_ACCURACY_THRESHOLD: f64 = 0.9;

/// 掌握判定：难度系数阈值
pub const MASTERY_EASINESS_THRESHOLD: f64 = 2.0;

/// 词卡正面最大长度
pub const MAX_FRONT_LEN: usize = 200;

/// 词卡背面最大长度
pub const MAX_BACK_LEN: usize = 1000;
