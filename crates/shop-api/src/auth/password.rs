//! 비밀번호 해싱 유틸리티.
//!
//! 새 비밀번호는 Argon2id로 해싱합니다. 이전 배포에서 저장된
//! bcrypt 해시(`$2a$`, `$2b$`, `$2y$`)도 검증할 수 있습니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("비밀번호 검증 실패")]
    VerificationFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
}

/// 비밀번호 해싱.
///
/// 솔트는 자동으로 생성되며 PHC 형식 문자열에 포함됩니다.
///
/// ```rust,ignore
/// let hash = hash_password("my_secure_password").unwrap();
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 일치하면 `Ok(())`, 불일치하면 `VerificationFailed`,
/// 저장된 해시를 해석할 수 없으면 `InvalidHashFormat`.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    if is_bcrypt_hash(hash) {
        return match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::VerificationFailed),
            Err(_) => Err(PasswordError::InvalidHashFormat),
        };
    }

    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "TestPassword123!";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash).is_ok());
        assert!(matches!(
            verify_password("WrongPassword123!", &hash),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hash1 = hash_password("Password1").unwrap();
        let hash2 = hash_password("Password1").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("Password1", &hash1).is_ok());
        assert!(verify_password("Password1", &hash2).is_ok());
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "not-a-valid-hash");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_legacy_bcrypt_hash() {
        let legacy = bcrypt::hash("AdminPass123", 4).unwrap();
        assert!(legacy.starts_with("$2"));

        assert!(verify_password("AdminPass123", &legacy).is_ok());
        assert!(matches!(
            verify_password("adminpass123", &legacy),
            Err(PasswordError::VerificationFailed)
        ));
    }

    #[test]
    fn test_unicode_password() {
        let password = "비밀번호123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).is_ok());
    }
}
