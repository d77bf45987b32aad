//! Default-site fixture.
//!
//! # Responsibility
//! - Bootstrap an empty database into a browsable default site.
//!
//! # Invariants
//! - A run is one write transaction: it seeds everything or nothing.
//! - Every step is insert-if-absent: re-running never duplicates rows or
//!   overwrites values changed since the first run.
//! - The sample post reaches its category through `attach`, so the
//!   category count is maintained like any other membership.

use crate::model::comment::COMMENT_APPROVED;
use crate::model::meta::MetaOwner;
use crate::model::option::{Autoload, SiteOption};
use crate::model::post::{NewPost, PostId};
use crate::model::taxonomy::{TermTaxonomyId, TAXONOMY_CATEGORY};
use crate::model::user::{NewUser, UserId};
use crate::repo::meta_repo::{MetaRepository, SqliteMetaRepository};
use crate::repo::option_repo::{OptionRepository, SqliteOptionRepository};
use crate::repo::post_repo::{PostRepository, SqlitePostRepository};
use crate::repo::taxonomy_repo::{SqliteTaxonomyRepository, TaxonomyRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::{RepoResult, WriteTx};
use log::info;
use rusqlite::{params, Connection};

pub const ADMIN_LOGIN: &str = "admin";
pub const SAMPLE_POST_ID: PostId = 1;
pub const SAMPLE_POST_SLUG: &str = "hello-world";
pub const UNCATEGORIZED_TERM_TAXONOMY_ID: TermTaxonomyId = 1;

const ADMIN_PASS_HASH: &str = "$P$BdlLcXuQteEAx0J6tMW5l0nX4.L2Ky/";
const SAMPLE_POST_CONTENT: &str =
    "Welcome to WordPress. This is your first post. Edit or delete it, then start writing!";
const SAMPLE_POST_EXCERPT: &str = "Your first post, with a sample comment to moderate.";
const SAMPLE_COMMENT_CONTENT: &str = "Hi, this is a comment.\nTo get started with moderating, editing, and deleting comments, please visit the Comments screen in the dashboard.\nCommenter avatars come from <a href=\"https://gravatar.com\">Gravatar</a>.";

const ADMIN_META: &[(&str, &str)] = &[
    ("wp_capabilities", "a:1:{s:13:\"administrator\";b:1;}"),
    ("wp_user_level", "10"),
    ("first_name", "Admin"),
    ("last_name", "User"),
];

/// Baseline options of a fresh site: `(name, value, autoload)`.
pub const DEFAULT_OPTIONS: &[(&str, &str, Autoload)] = &[
    ("siteurl", "http://localhost:3000", Autoload::Yes),
    ("home", "http://localhost:3000", Autoload::Yes),
    ("blogname", "WordPress Site", Autoload::Yes),
    ("blogdescription", "Just another WordPress site", Autoload::Yes),
    ("users_can_register", "0", Autoload::Yes),
    ("admin_email", "admin@wordpress.local", Autoload::Yes),
    ("start_of_week", "1", Autoload::Yes),
    ("use_balanceTags", "0", Autoload::Yes),
    ("use_smilies", "1", Autoload::Yes),
    ("require_name_email", "1", Autoload::Yes),
    ("comments_notify", "1", Autoload::Yes),
    ("posts_per_rss", "10", Autoload::Yes),
    ("rss_use_excerpt", "0", Autoload::Yes),
    ("mailserver_url", "mail.example.com", Autoload::Yes),
    ("mailserver_login", "login@example.com", Autoload::Yes),
    ("mailserver_pass", "password", Autoload::Yes),
    ("mailserver_port", "110", Autoload::Yes),
    ("default_category", "1", Autoload::Yes),
    ("default_comment_status", "open", Autoload::Yes),
    ("default_ping_status", "open", Autoload::Yes),
    ("default_pingback_flag", "1", Autoload::Yes),
    ("posts_per_page", "10", Autoload::Yes),
    ("date_format", "F j, Y", Autoload::Yes),
    ("time_format", "g:i a", Autoload::Yes),
    ("links_updated_date_format", "F j, Y g:i a", Autoload::Yes),
    ("comment_moderation", "0", Autoload::Yes),
    ("moderation_notify", "1", Autoload::Yes),
    ("permalink_structure", "/%year%/%monthnum%/%day%/%postname%/", Autoload::Yes),
    ("rewrite_rules", "", Autoload::Yes),
    ("hack_file", "0", Autoload::Yes),
    ("blog_charset", "UTF-8", Autoload::Yes),
    ("moderation_keys", "", Autoload::No),
    ("active_plugins", "a:0:{}", Autoload::Yes),
    ("category_base", "", Autoload::Yes),
    ("ping_sites", "http://rpc.pingomatic.com/", Autoload::Yes),
    ("comment_max_links", "2", Autoload::Yes),
    ("gmt_offset", "0", Autoload::Yes),
    ("default_email_category", "1", Autoload::Yes),
    ("recently_edited", "", Autoload::No),
    ("template", "twentytwentyfive", Autoload::Yes),
    ("stylesheet", "twentytwentyfive", Autoload::Yes),
    ("comment_registration", "0", Autoload::Yes),
    ("html_type", "text/html", Autoload::Yes),
    ("use_trackback", "0", Autoload::Yes),
    ("default_role", "subscriber", Autoload::Yes),
    ("db_version", "57155", Autoload::Yes),
    ("uploads_use_yearmonth_folders", "1", Autoload::Yes),
    ("upload_path", "", Autoload::Yes),
    ("blog_public", "1", Autoload::Yes),
    ("default_link_category", "2", Autoload::Yes),
    ("show_on_front", "posts", Autoload::Yes),
    ("tag_base", "", Autoload::Yes),
    ("show_avatars", "1", Autoload::Yes),
    ("avatar_rating", "G", Autoload::Yes),
    ("upload_url_path", "", Autoload::Yes),
    ("thumbnail_size_w", "150", Autoload::Yes),
    ("thumbnail_size_h", "150", Autoload::Yes),
    ("thumbnail_crop", "1", Autoload::Yes),
    ("medium_size_w", "300", Autoload::Yes),
    ("medium_size_h", "300", Autoload::Yes),
    ("avatar_default", "mystery", Autoload::Yes),
    ("large_size_w", "1024", Autoload::Yes),
    ("large_size_h", "1024", Autoload::Yes),
    ("image_default_link_type", "none", Autoload::Yes),
    ("image_default_size", "", Autoload::Yes),
    ("image_default_align", "", Autoload::Yes),
    ("close_comments_for_old_posts", "0", Autoload::Yes),
    ("close_comments_days_old", "14", Autoload::Yes),
    ("thread_comments", "1", Autoload::Yes),
    ("thread_comments_depth", "5", Autoload::Yes),
    ("page_comments", "0", Autoload::Yes),
    ("comments_per_page", "50", Autoload::Yes),
    ("default_comments_page", "newest", Autoload::Yes),
    ("comment_order", "asc", Autoload::Yes),
    ("sticky_posts", "a:0:{}", Autoload::Yes),
    ("widget_categories", "a:0:{}", Autoload::Yes),
    ("widget_text", "a:0:{}", Autoload::Yes),
    ("widget_rss", "a:0:{}", Autoload::Yes),
    ("uninstall_plugins", "a:0:{}", Autoload::No),
    ("timezone_string", "", Autoload::Yes),
    ("page_for_posts", "0", Autoload::Yes),
    ("page_on_front", "0", Autoload::Yes),
    ("default_post_format", "0", Autoload::Yes),
    ("link_manager_enabled", "0", Autoload::Yes),
    ("finished_splitting_shared_terms", "1", Autoload::Yes),
    ("site_icon", "0", Autoload::Yes),
    ("medium_large_size_w", "768", Autoload::Yes),
    ("medium_large_size_h", "0", Autoload::Yes),
    ("wp_page_for_privacy_policy", "3", Autoload::Yes),
    ("show_comments_cookies_opt_in", "1", Autoload::Yes),
    ("admin_email_lifespan", "1735689600", Autoload::Yes),
    ("disallowed_keys", "", Autoload::No),
    ("comment_previously_approved", "1", Autoload::Yes),
    ("auto_plugin_theme_update_emails", "a:0:{}", Autoload::No),
    ("auto_update_core_dev", "enabled", Autoload::Yes),
    ("auto_update_core_minor", "enabled", Autoload::Yes),
    ("auto_update_core_major", "enabled", Autoload::Yes),
];

/// What a seeding run created. Zero/`false` fields were already present.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedReport {
    pub admin_user_id: UserId,
    pub user_meta_created: usize,
    pub options_created: usize,
    pub category_created: bool,
    pub post_created: bool,
    pub post_attached: bool,
    pub comment_created: bool,
}

/// Seeds the default site into a migrated connection. Safe to re-run.
pub fn seed_defaults(conn: &Connection) -> RepoResult<SeedReport> {
    let users = SqliteUserRepository::try_new(conn)?;
    let meta = SqliteMetaRepository::try_new(conn)?;
    let options = SqliteOptionRepository::try_new(conn)?;
    let taxonomy = SqliteTaxonomyRepository::try_new(conn)?;
    let posts = SqlitePostRepository::try_new(conn)?;
    let tx = WriteTx::begin(conn)?;

    let admin = users.upsert_user_by_login(&NewUser {
        login: ADMIN_LOGIN.to_string(),
        pass_hash: ADMIN_PASS_HASH.to_string(),
        nicename: "admin".to_string(),
        email: "admin@wordpress.local".to_string(),
        url: String::new(),
        display_name: "Administrator".to_string(),
    })?;

    let admin_meta: Vec<(String, String)> = ADMIN_META
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    let user_meta_created = meta.add_many(MetaOwner::User(admin.id), &admin_meta)?;

    let default_options: Vec<SiteOption> = DEFAULT_OPTIONS
        .iter()
        .map(|(name, value, autoload)| SiteOption {
            name: name.to_string(),
            value: value.to_string(),
            autoload: *autoload,
        })
        .collect();
    let options_created = options.add_options(&default_options)?;

    let category_created = seed_uncategorized(conn)?;

    let post_created = match posts.get_post(SAMPLE_POST_ID)? {
        Some(_) => false,
        None => {
            let mut post = NewPost::new(admin.id, "Hello World!", SAMPLE_POST_SLUG);
            post.id = Some(SAMPLE_POST_ID);
            post.content = SAMPLE_POST_CONTENT.to_string();
            post.excerpt = SAMPLE_POST_EXCERPT.to_string();
            post.guid = format!("http://localhost:3000/?p={SAMPLE_POST_ID}");
            posts.create_post(&post)?;
            true
        }
    };

    let post_attached = taxonomy.attach(SAMPLE_POST_ID, UNCATEGORIZED_TERM_TAXONOMY_ID, 0)?;
    let comment_created = seed_sample_comment(conn)?;
    tx.commit()?;

    let report = SeedReport {
        admin_user_id: admin.id,
        user_meta_created,
        options_created,
        category_created,
        post_created,
        post_attached,
        comment_created,
    };
    info!(
        "event=seed module=seed status=ok user_meta_created={} options_created={} post_created={} comment_created={}",
        report.user_meta_created,
        report.options_created,
        report.post_created,
        report.comment_created
    );
    Ok(report)
}

/// Fixed-id "Uncategorized" term and its `category` scope, created with a
/// zero count.
fn seed_uncategorized(conn: &Connection) -> RepoResult<bool> {
    conn.execute(
        "INSERT INTO terms (term_id, name, slug, term_group)
         VALUES (1, 'Uncategorized', 'uncategorized', 0)
         ON CONFLICT DO NOTHING;",
        [],
    )?;
    let created = conn.execute(
        "INSERT INTO term_taxonomy (term_taxonomy_id, term_id, taxonomy, description, parent, count)
         VALUES (?1, 1, ?2, '', NULL, 0)
         ON CONFLICT DO NOTHING;",
        params![UNCATEGORIZED_TERM_TAXONOMY_ID, TAXONOMY_CATEGORY],
    )?;
    Ok(created > 0)
}

fn seed_sample_comment(conn: &Connection) -> RepoResult<bool> {
    let created = conn.execute(
        "INSERT INTO comments (
            comment_id,
            comment_post_id,
            comment_author,
            comment_author_email,
            comment_author_url,
            comment_author_ip,
            comment_content,
            comment_approved,
            comment_type,
            comment_parent,
            user_id
        ) VALUES (1, ?1, 'A WordPress Commenter', 'author@wordpress.example',
                  'https://wordpress.org/', '127.0.0.1', ?2, ?3, 'comment', 0, 0)
        ON CONFLICT DO NOTHING;",
        params![SAMPLE_POST_ID, SAMPLE_COMMENT_CONTENT, COMMENT_APPROVED],
    )?;
    Ok(created > 0)
}

#[cfg(test)]
mod tests {
    use super::DEFAULT_OPTIONS;
    use crate::model::option::Autoload;
    use std::collections::HashSet;

    #[test]
    fn default_option_names_are_unique() {
        let names: HashSet<_> = DEFAULT_OPTIONS.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(names.len(), DEFAULT_OPTIONS.len());
    }

    #[test]
    fn moderation_lists_are_not_autoloaded() {
        let autoload = |wanted: &str| {
            DEFAULT_OPTIONS
                .iter()
                .find(|(name, _, _)| *name == wanted)
                .map(|(_, _, autoload)| *autoload)
        };
        assert_eq!(autoload("moderation_keys"), Some(Autoload::No));
        assert_eq!(autoload("blogname"), Some(Autoload::Yes));
    }
}
