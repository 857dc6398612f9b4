use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::compare::text_contains;
use crate::error::AssertError;

/// A captured outbound e-mail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Email {
    pub from: Option<String>,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Email {
    pub fn new(subject: impl Into<String>) -> Self {
        Email {
            subject: subject.into(),
            ..Email::default()
        }
    }

    pub fn sender(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text_body = Some(body.into());
        self
    }

    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html_body = Some(body.into());
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Body used for content assertions: HTML when present, else text.
    pub fn visible_body(&self) -> &str {
        self.html_body
            .as_deref()
            .or(self.text_body.as_deref())
            .unwrap_or("")
    }
}

/// In-process mail sink, wired into the application under test in place of a
/// real transport. Cloneable; clones share the captured mails.
#[derive(Debug, Clone, Default)]
pub struct TestTransport {
    mails: Arc<Mutex<Vec<Email>>>,
}

impl TestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self, mail: Email) {
        if let Ok(mut mails) = self.mails.lock() {
            mails.push(mail);
        }
    }

    pub fn mails(&self) -> Vec<Email> {
        self.mails.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn reset(&self) {
        if let Ok(mut mails) = self.mails.lock() {
            mails.clear();
        }
    }

    /// Locate a captured mail by recipient address and exact subject. The
    /// failure message dumps every captured mail.
    pub fn find_mail(&self, recipient: &str, subject: &str) -> Result<Email, AssertError> {
        let mails = self.mails();
        for mail in &mails {
            if mail.subject == subject && mail.to.iter().any(|to| to == recipient) {
                return Ok(mail.clone());
            }
        }
        Err(AssertError::MailNotFound {
            dump: dump_mails(&mails),
        })
    }

    /// Fail when any captured mail matches the given filters; with no
    /// filters, any mail at all fails.
    pub fn assert_no_mail(
        &self,
        recipient: Option<&str>,
        subject: Option<&str>,
    ) -> Result<(), AssertError> {
        for mail in self.mails() {
            if let Some(subject) = subject {
                if mail.subject != subject {
                    continue;
                }
            }
            let recipient_hit = match recipient {
                Some(address) => mail.to.iter().any(|to| to == address),
                None => true,
            };
            if recipient_hit {
                return Err(AssertError::MailFound {
                    dump: dump_mails(std::slice::from_ref(&mail)),
                });
            }
        }
        Ok(())
    }
}

pub fn assert_mail_contains(mail: &Email, spec: &str) -> Result<(), AssertError> {
    if text_contains(mail.visible_body(), spec)? {
        return Ok(());
    }
    Err(AssertError::TextNotFound {
        haystack: mail.visible_body().to_string(),
    })
}

pub fn assert_mail_not_contains(mail: &Email, spec: &str) -> Result<(), AssertError> {
    if text_contains(mail.visible_body(), spec)? {
        return Err(AssertError::TextFound);
    }
    Ok(())
}

/// Check an additional recipient; the failure lists the actual recipients.
pub fn assert_sent_to(mail: &Email, address: &str) -> Result<(), AssertError> {
    if mail.to.iter().any(|to| to == address) {
        return Ok(());
    }
    Err(AssertError::RecipientNotFound(mail.to.join(",")))
}

pub fn assert_sent_from(mail: &Email, address: &str) -> Result<(), AssertError> {
    let from = mail.from.as_deref().unwrap_or("");
    if from == address {
        return Ok(());
    }
    Err(AssertError::SenderMismatch(from.to_string()))
}

pub fn find_attachment<'a>(mail: &'a Email, name: &str) -> Result<&'a Attachment, AssertError> {
    mail.attachments
        .iter()
        .find(|attachment| attachment.file_name == name)
        .ok_or_else(|| AssertError::AttachmentNotFound(name.to_string()))
}

fn dump_mails(mails: &[Email]) -> String {
    if mails.is_empty() {
        return "-no mails sent-".to_string();
    }
    mails
        .iter()
        .map(|mail| {
            format!(
                "From: {}\n  To: {}\n  Subject: {}",
                mail.from.as_deref().unwrap_or(""),
                mail.to.join(","),
                mail.subject
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ---\n  ")
}
