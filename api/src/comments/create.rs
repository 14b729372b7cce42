use axum::{Json, debug_handler, extract::State, http::StatusCode};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    models::comment::{Comment, NewComment, status},
    real_ip::ClientIp,
    schema::{articles, comments, subscribers},
};

#[derive(Deserialize, Serialize)]
pub struct CommentSubmission {
    articulo_id: i32,
    parent_id: Option<i32>,
    author_name: String,
    author_email: String,
    content: String,
}

impl CommentSubmission {
    fn validate(&mut self) -> Result<(), &'static str> {
        self.author_name = self.author_name.trim().to_string();
        if self.author_name.is_empty() {
            return Err("No author name provided");
        }
        if self.author_name.len() > 50 {
            return Err("Author name too long");
        }

        self.author_email = self.author_email.trim().to_lowercase();
        if self.author_email.len() > 100 {
            return Err("Email too long");
        }
        if !self.author_email.contains('@') {
            return Err("Invalid email");
        }

        self.content = self.content.trim().to_string();
        if self.content.chars().count() < 10 {
            return Err("Content too short (min 10 characters)");
        }
        if self.content.len() > 5000 {
            return Err("Content too long (max 5000 characters)");
        }

        Ok(())
    }
}

#[derive(Serialize)]
pub struct CreatedResponse {
    success: bool,
    comment: Comment,
}

#[debug_handler]
pub async fn create_comment(
    State(ctx): State<App>,
    ClientIp(ip): ClientIp,
    crate::json::Json(mut submission): crate::json::Json<CommentSubmission>,
) -> Result<Json<CreatedResponse>, AppError> {
    submission
        .validate()
        .map_err(|e| (e, StatusCode::BAD_REQUEST))?;

    let mut conn = ctx.diesel.get().await?;

    // Commenting is a subscriber perk
    let is_subscriber: Option<i32> = subscribers::table
        .filter(subscribers::email.eq(&submission.author_email))
        .filter(subscribers::confirmed.eq(true))
        .select(subscribers::id)
        .first(&mut conn)
        .await
        .optional()?;

    if is_subscriber.is_none() {
        return Err((
            "Only confirmed subscribers can comment",
            StatusCode::FORBIDDEN,
        ))?;
    }

    let article_exists: Option<i32> = articles::table
        .filter(articles::id.eq(submission.articulo_id))
        .select(articles::id)
        .first(&mut conn)
        .await
        .optional()?;

    if article_exists.is_none() {
        return Err(("Article not found", StatusCode::NOT_FOUND))?;
    }

    // check that the parent comment actually belongs to the article
    if let Some(parent_id) = submission.parent_id {
        let parent_matches: Option<i32> = comments::table
            .filter(comments::id.eq(parent_id))
            .filter(comments::article_id.eq(submission.articulo_id))
            .select(comments::id)
            .first(&mut conn)
            .await
            .optional()?;

        if parent_matches.is_none() {
            return Err("You're replying to a comment that does not belong to this article")?;
        }
    }

    let initial_status = if ctx.config.moderate_comments {
        status::PENDING
    } else {
        status::APPROVED
    };

    let comment: Comment = diesel::insert_into(comments::table)
        .values(NewComment {
            article_id: submission.articulo_id,
            parent_id: submission.parent_id,
            author_name: submission.author_name,
            author_email: submission.author_email,
            author_ip: ip.to_string(),
            content: submission.content,
            status: initial_status.into(),
        })
        .returning(Comment::as_returning())
        .get_result(&mut conn)
        .await?;

    Ok(Json(CreatedResponse {
        success: true,
        comment,
    }))
}

#[cfg(test)]
mod test {
    use super::*;

    fn submission(content: &str, email: &str) -> CommentSubmission {
        CommentSubmission {
            articulo_id: 1,
            parent_id: None,
            author_name: "Lectora".into(),
            author_email: email.into(),
            content: content.into(),
        }
    }

    #[test]
    fn test_short_content_is_rejected() {
        let mut s = submission("muy corto", "a@b.es");
        assert!(s.validate().is_err());

        let mut s = submission("esto ya tiene largo suficiente", "a@b.es");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_content_is_trimmed_before_the_length_check() {
        let mut s = submission("   corto    ", "a@b.es");
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_email_is_normalized() {
        let mut s = submission("un comentario con sustancia", "  Ana@Example.COM ");
        s.validate().unwrap();
        assert_eq!(s.author_email, "ana@example.com");
    }

    #[test]
    fn test_missing_author_name_is_rejected() {
        let mut s = submission("un comentario con sustancia", "a@b.es");
        s.author_name = "   ".into();
        assert!(s.validate().is_err());
    }
}
