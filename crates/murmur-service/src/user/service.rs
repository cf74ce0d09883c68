//! User service — account creation, login, profile editing, and the
//! follow graph.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use murmur_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use murmur_auth::password::{PasswordHasher, PasswordValidator};
use murmur_core::error::AppError;
use murmur_core::result::AppResult;
use murmur_database::repositories::post::PostRepository;
use murmur_database::repositories::user::UserRepository;
use murmur_entity::post::Post;
use murmur_entity::user::{CreateUser, PublicUserProfile, UpdateProfile, User};

use crate::context::RequestContext;

/// Handles user accounts and the follow graph.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    users: Arc<UserRepository>,
    /// Post repository (profile pages embed the user's posts).
    posts: Arc<PostRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Signup input policy.
    validator: Arc<PasswordValidator>,
    /// Token issuer.
    jwt_encoder: Arc<JwtEncoder>,
    /// Token verifier (for refresh).
    jwt_decoder: Arc<JwtDecoder>,
}

/// A logged-in or newly registered user with fresh tokens.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The user record.
    pub user: User,
    /// Fresh access + refresh tokens.
    pub tokens: TokenPair,
}

/// Result of a follow/unfollow toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowChange {
    /// The acting user's updated following list.
    pub following: Vec<Uuid>,
    /// The target user's updated followers list.
    pub followers: Vec<Uuid>,
    /// Whether the acting user now follows the target.
    pub is_following: bool,
}

/// A public profile page: the user plus their posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileWithPosts {
    /// The profile owner.
    pub user: User,
    /// All posts by the user, newest first.
    pub posts: Vec<Post>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<UserRepository>,
        posts: Arc<PostRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            users,
            posts,
            hasher,
            validator,
            jwt_encoder,
            jwt_decoder,
        }
    }

    /// Registers a new account and logs it in.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<AuthenticatedUser> {
        self.validator.validate_username(username)?;
        self.validator.validate(password)?;

        let by_email = self.users.find_by_email(email).await?;
        let by_name = self.users.find_by_username(username).await?;
        if by_email.is_some() || by_name.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        let tokens = self.jwt_encoder.generate_token_pair(user.id, &user.username)?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(AuthenticatedUser { user, tokens })
    }

    /// Authenticates by email and password.
    ///
    /// Both unknown email and wrong password answer identically.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        let valid = self.hasher.verify_password(password, &user.password_hash)?;
        if !valid {
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        let tokens = self.jwt_encoder.generate_token_pair(user.id, &user.username)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthenticatedUser { user, tokens })
    }

    /// Exchanges a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthenticatedUser> {
        let claims = self.jwt_decoder.decode_refresh_token(refresh_token)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        let tokens = self.jwt_encoder.generate_token_pair(user.id, &user.username)?;
        Ok(AuthenticatedUser { user, tokens })
    }

    /// The current user's own record.
    pub async fn me(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates the caller's profile.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        update: UpdateProfile,
    ) -> AppResult<User> {
        let user = self.me(ctx).await?;

        let username = match update.username {
            Some(new_name) if new_name != user.username => {
                self.validator.validate_username(&new_name)?;
                if self.users.find_by_username(&new_name).await?.is_some() {
                    return Err(AppError::validation("Username already taken"));
                }
                new_name
            }
            _ => user.username.clone(),
        };

        let bio = update.bio.unwrap_or_else(|| user.bio.clone());
        let avatar = update.avatar.or_else(|| user.avatar.clone());

        let updated = self
            .users
            .update_profile(user.id, &username, &bio, avatar.as_deref())
            .await?;

        info!(user_id = %updated.id, "Profile updated");
        Ok(updated)
    }

    /// Follows or unfollows the target user, toggling on current state.
    pub async fn follow_toggle(
        &self,
        ctx: &RequestContext,
        target_id: Uuid,
    ) -> AppResult<FollowChange> {
        if ctx.user_id == target_id {
            return Err(AppError::validation("You cannot follow yourself"));
        }

        let target = self
            .users
            .find_by_id(target_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let current = self.me(ctx).await?;

        let was_following = current.is_following(target_id);

        let mut following = current.following.clone();
        let mut followers = target.followers.clone();
        if was_following {
            following.retain(|id| *id != target_id);
            followers.retain(|id| *id != current.id);
        } else {
            following.push(target_id);
            followers.push(current.id);
        }

        self.users
            .update_follow_edges(current.id, &following, target.id, &followers)
            .await?;

        info!(
            user_id = %current.id,
            target_id = %target.id,
            following = !was_following,
            "Follow toggled"
        );

        Ok(FollowChange {
            following,
            followers,
            is_following: !was_following,
        })
    }

    /// A user's public profile page with all their posts.
    pub async fn profile_with_posts(&self, user_id: Uuid) -> AppResult<ProfileWithPosts> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let posts = self.posts.find_by_author(user_id).await?;
        Ok(ProfileWithPosts { user, posts })
    }

    /// Public profiles of the user's followers.
    pub async fn followers(&self, user_id: Uuid) -> AppResult<Vec<PublicUserProfile>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let users = self.users.find_by_ids(&user.followers).await?;
        Ok(users.iter().map(PublicUserProfile::from).collect())
    }

    /// Public profiles of the users this user follows.
    pub async fn following(&self, user_id: Uuid) -> AppResult<Vec<PublicUserProfile>> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let users = self.users.find_by_ids(&user.following).await?;
        Ok(users.iter().map(PublicUserProfile::from).collect())
    }
}
