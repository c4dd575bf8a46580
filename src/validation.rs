//! 用户自建词卡的输入验证
//! 在进入 ProgressStore 之前拒绝非法输入，错误同步返回给调用方。

use crate::constants::{MAX_BACK_LEN, MAX_FRONT_LEN};

/// 验证词卡正面：非空且不超过最大长度
pub fn validate_front(front: &str) -> Result<(), &'static str> {
    let trimmed = front.trim();
    if trimmed.is_empty() {
        return Err("词卡正面不能为空");
    }
    if trimmed.chars().count() > MAX_FRONT_LEN {
        return Err("词卡正面过长");
    }
    Ok(())
}

/// 验证词卡背面：非空且不超过最大长度
pub fn validate_back(back: &str) -> Result<(), &'static str> {
    let trimmed = back.trim();
    if trimmed.is_empty() {
        return Err("词卡背面不能为空");
    }
    if trimmed.chars().count() > MAX_BACK_LEN {
        return Err("词卡背面过长");
    }
    Ok(())
}
