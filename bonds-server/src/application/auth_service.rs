use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::debug;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::JwtService;

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: JwtService,
}

impl<R: UserRepository> AuthService<R> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(repo: R, jwt: JwtService) -> Self {
        Self { repo, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        let password_hash = self.hash_password(&req.password)?;

        let new_user = NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        };
        self.repo.create_user(new_user).await
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_email(&req.email).await? {
            Some(user_creds) => user_creds,
            None => {
                // keep verification time even when the user does not exist
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;

        if !user_creds.user.is_active {
            return Err(DomainError::Unauthorized);
        }

        let access_token = self
            .jwt
            .issue_token(user_creds.user.id)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(AuthResult {
            user: user_creds.user,
            access_token,
        })
    }

    /// Resolves the bearer of `token` to an active account. Any token or
    /// lookup problem collapses to `Unauthorized` at this boundary.
    pub(crate) async fn current_user(&self, token: &str) -> Result<User, DomainError> {
        let payload = self.jwt.decode_token(token).map_err(|err| {
            debug!(error = %err, "token rejected");
            DomainError::Unauthorized
        })?;

        let user = self
            .repo
            .find_by_id(payload.subject_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !user.is_active {
            return Err(DomainError::Unauthorized);
        }

        Ok(user)
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    use super::AuthService;
    use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginRequest, RegisterRequest, User};
    use crate::infrastructure::jwt::test_keys::{PRIVATE_PEM, PUBLIC_PEM};
    use crate::infrastructure::jwt::{Claims, JwtService};

    #[derive(Clone)]
    struct FakeUserRepo {
        created_input: Arc<Mutex<Option<NewUser>>>,
        credentials: Arc<Mutex<Option<UserCredentials>>>,
        user_by_id: Arc<Mutex<Option<User>>>,
        create_user_out: User,
    }

    impl FakeUserRepo {
        fn new(create_user_out: User) -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                credentials: Arc::new(Mutex::new(None)),
                user_by_id: Arc::new(Mutex::new(None)),
                create_user_out,
            }
        }

        fn set_credentials(&self, creds: Option<UserCredentials>) {
            *self.credentials.lock().expect("credentials mutex poisoned") = creds;
        }

        fn set_user_by_id(&self, user: Option<User>) {
            *self.user_by_id.lock().expect("user_by_id mutex poisoned") = user;
        }

        fn take_created_input(&self) -> Option<NewUser> {
            self.created_input
                .lock()
                .expect("created input mutex poisoned")
                .take()
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created input mutex poisoned") = Some(input);
            Ok(self.create_user_out.clone())
        }

        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(self
                .credentials
                .lock()
                .expect("credentials mutex poisoned")
                .clone())
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<User>, DomainError> {
            Ok(self
                .user_by_id
                .lock()
                .expect("user_by_id mutex poisoned")
                .clone())
        }
    }

    #[tokio::test]
    async fn register_hashes_password_before_repo_call() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        let service = AuthService::new(repo.clone(), test_jwt());

        let req = RegisterRequest {
            username: "  valid_user  ".to_string(),
            email: "  VALID@EXAMPLE.COM  ".to_string(),
            password: "very-secure-password".to_string(),
        };

        let user = service.register(req).await.expect("register must succeed");
        assert_eq!(user.username, "valid_user");

        let created = repo
            .take_created_input()
            .expect("create_user must be called");
        assert_eq!(created.username, "valid_user");
        assert_eq!(created.email, "valid@example.com");
        assert_ne!(created.password_hash, "very-secure-password");
        assert!(!created.password_hash.is_empty());
    }

    #[tokio::test]
    async fn same_plaintext_hashes_differently_but_both_verify() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        let service = AuthService::new(repo, test_jwt());

        let first = service.hash_password("s3cret-enough").expect("hash one");
        let second = service.hash_password("s3cret-enough").expect("hash two");

        assert_ne!(first, second);
        assert!(service.verify_password("s3cret-enough", &first).is_ok());
        assert!(service.verify_password("s3cret-enough", &second).is_ok());
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_missing_user() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        repo.set_credentials(None);
        let service = AuthService::new(repo, test_jwt());

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "some-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_wrong_password() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        let service = AuthService::new(repo.clone(), test_jwt());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com", true),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_rejects_inactive_user() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        let service = AuthService::new(repo.clone(), test_jwt());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com", false),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "correct-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn login_issues_token_for_the_right_subject() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        let service = AuthService::new(repo.clone(), test_jwt());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_credentials(Some(UserCredentials {
            user: sample_user(7, "valid_user", "valid@example.com", true),
            password_hash: hash,
        }));

        let req = LoginRequest {
            email: "valid@example.com".to_string(),
            password: "correct-password".to_string(),
        };

        let result = service.login(req).await.expect("login must succeed");
        assert_eq!(result.user.id, 7);

        let payload = test_jwt()
            .decode_token(&result.access_token)
            .expect("token must decode");
        assert_eq!(payload.subject_id, 7);
    }

    #[tokio::test]
    async fn current_user_resolves_active_account() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        repo.set_user_by_id(Some(sample_user(7, "valid_user", "valid@example.com", true)));
        let service = AuthService::new(repo, test_jwt());

        let token = test_jwt().issue_token(7).expect("token must be issued");
        let user = service
            .current_user(&token)
            .await
            .expect("must resolve user");
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn current_user_rejects_expired_token() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        repo.set_user_by_id(Some(sample_user(7, "valid_user", "valid@example.com", true)));
        let service = AuthService::new(repo, test_jwt());

        let claims = Claims {
            sub: "7".to_string(),
            exp: (Utc::now() - chrono::Duration::seconds(60)).timestamp(),
        };
        let encoding = EncodingKey::from_rsa_pem(PRIVATE_PEM).expect("key must parse");
        let token =
            encode(&Header::new(Algorithm::RS256), &claims, &encoding).expect("must encode");

        let err = service
            .current_user(&token)
            .await
            .expect_err("expired token must be rejected");
        assert!(matches!(err, DomainError::Unauthorized));
    }

    #[tokio::test]
    async fn current_user_rejects_inactive_account() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com", true));
        repo.set_user_by_id(Some(sample_user(7, "valid_user", "valid@example.com", false)));
        let service = AuthService::new(repo, test_jwt());

        let token = test_jwt().issue_token(7).expect("token must be issued");
        let err = service
            .current_user(&token)
            .await
            .expect_err("inactive user must be rejected");
        assert!(matches!(err, DomainError::Unauthorized));
    }

    fn sample_user(id: i64, username: &str, email: &str, is_active: bool) -> User {
        User::new(id, username, email, is_active, false, Utc::now())
            .expect("sample user must be valid")
    }

    fn test_jwt() -> JwtService {
        JwtService::from_pem(PRIVATE_PEM, PUBLIC_PEM, 15).expect("test keys must parse")
    }
}
