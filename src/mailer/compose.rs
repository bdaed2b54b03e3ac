//! Message composition for the three notification kinds.
//!
//! Every user-supplied value is HTML-escaped before interpolation so a
//! submission cannot inject markup into the message. The one exception is
//! blog post content, which is markup by contract and rendered as-is.

use chrono::Utc;

use crate::config::MailConfig;

use super::{Attachment, Outgoing};

/// Escape the five HTML metacharacters so user input renders as literal text.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape, then turn newlines into `<br/>` for multi-line free text.
fn escape_multiline(input: &str) -> String {
    escape_html(input).replace('\n', "<br/>")
}

/// Contact form submission relayed to the company inbox.
pub fn contact_email(
    config: &MailConfig,
    name: &str,
    email: &str,
    phone: Option<&str>,
    subject: &str,
    message: &str,
) -> Outgoing {
    let sent_at = Utc::now().to_rfc3339();

    let html = format!(
        r#"<div style="font-family: Arial, Helvetica, sans-serif; color:#222; line-height:1.5;">
  <h2 style="margin-bottom:6px;color:#0b66c3">New Contact Form Submission</h2>
  <table style="border-collapse:collapse;">
    <tr><td style="padding:4px 8px;"><strong>Name:</strong></td><td style="padding:4px 8px;">{name}</td></tr>
    <tr><td style="padding:4px 8px;"><strong>Email:</strong></td><td style="padding:4px 8px;">{email}</td></tr>
    <tr><td style="padding:4px 8px;"><strong>Phone:</strong></td><td style="padding:4px 8px;">{phone}</td></tr>
    <tr><td style="padding:4px 8px;"><strong>Subject:</strong></td><td style="padding:4px 8px;">{subject}</td></tr>
    <tr><td style="padding:4px 8px; vertical-align:top;"><strong>Message:</strong></td><td style="padding:4px 8px;">{message}</td></tr>
  </table>
  <hr style="border:none;border-top:1px solid #eee;margin:12px 0"/>
  <p style="font-size:12px;color:#666">Sent from the website contact form on {sent_at}</p>
</div>"#,
        name = escape_html(name),
        email = escape_html(email),
        phone = escape_html(phone.unwrap_or("-")),
        subject = escape_html(subject),
        message = escape_multiline(message),
        sent_at = escape_html(&sent_at),
    );

    let text = format!(
        "New contact form submission\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Subject: {subject}\n\
         Message:\n{message}\n\n\
         Sent: {sent_at}",
        phone = phone.unwrap_or("-"),
    );

    Outgoing::new(
        &config.company_email,
        format!("[Contact] {subject} - {name}"),
        html,
        text,
    )
    .reply_to(email)
}

/// Job application relayed to the company inbox, resume attached when given.
#[allow(clippy::too_many_arguments)]
pub fn application_email(
    config: &MailConfig,
    name: &str,
    email: &str,
    phone: Option<&str>,
    position: &str,
    cover_letter: Option<&str>,
    resume: Option<Attachment>,
) -> Outgoing {
    let html = format!(
        r#"<h3>Job application: {position}</h3>
<p><strong>Name:</strong> {name}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Phone:</strong> {phone}</p>
<p><strong>Position:</strong> {position}</p>
<p><strong>Cover letter:</strong><br/>{cover_letter}</p>"#,
        position = escape_html(position),
        name = escape_html(name),
        email = escape_html(email),
        phone = escape_html(phone.unwrap_or("-")),
        cover_letter = escape_multiline(cover_letter.unwrap_or("")),
    );

    let text = format!(
        "Job application: {position}\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Cover letter:\n{cover_letter}",
        phone = phone.unwrap_or("-"),
        cover_letter = cover_letter.unwrap_or(""),
    );

    let mut mail = Outgoing::new(
        &config.company_email,
        format!("[Career] Application for {position} - {name}"),
        html,
        text,
    )
    .reply_to(email);

    if let Some(resume) = resume {
        mail = mail.attach(resume);
    }
    mail
}

/// Notification that a new blog post was submitted (notify mode). The post
/// content is author-supplied markup and is rendered unescaped.
pub fn blog_notice_email(
    config: &MailConfig,
    title: &str,
    author: &str,
    tags: &[String],
    content: &str,
) -> Outgoing {
    let tags_line = tags.join(", ");

    let html = format!(
        r#"<h3>New blog posted</h3>
<p><strong>Title:</strong> {title}</p>
<p><strong>Author:</strong> {author}</p>
<p><strong>Tags:</strong> {tags}</p>
<hr/>
<div>{content}</div>"#,
        title = escape_html(title),
        author = escape_html(author),
        tags = escape_html(&tags_line),
    );

    let text = format!(
        "New blog posted\n\
         Title: {title}\n\
         Author: {author}\n\
         Tags: {tags_line}\n\n\
         {content}"
    );

    Outgoing::new(
        &config.company_email,
        format!("[Blog] New post: {title}"),
        html,
        text,
    )
}
