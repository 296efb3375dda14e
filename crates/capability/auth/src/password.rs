use crate::AuthError;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use subtle::ConstantTimeEq;

const ARGON2_PREFIX: &str = "$argon2";

/// 密码校验结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordVerdict {
    Matched,
    /// 历史明文密码匹配，附带应写回的新哈希。
    MatchedLegacy { upgrade_hash: String },
    Rejected,
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Internal(err.to_string()))
}

/// 校验密码：argon2 哈希走标准校验，其余视为历史明文并做常量时间比较。
pub fn verify_password(stored: &str, password: &str) -> Result<PasswordVerdict, AuthError> {
    if stored.starts_with(ARGON2_PREFIX) {
        let parsed =
            PasswordHash::new(stored).map_err(|err| AuthError::Internal(err.to_string()))?;
        let matched = Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        return Ok(if matched {
            PasswordVerdict::Matched
        } else {
            PasswordVerdict::Rejected
        });
    }
    let matched: bool = stored.as_bytes().ct_eq(password.as_bytes()).into();
    if !matched {
        return Ok(PasswordVerdict::Rejected);
    }
    Ok(PasswordVerdict::MatchedLegacy {
        upgrade_hash: hash_password(password)?,
    })
}
