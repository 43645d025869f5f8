#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc2822};

use crate::{config, progress::Detector};

/// A scan job tied to one course-module activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanJob {
    /// Course-module id of the assignment the scan ran for.
    pub cmid: i64,
}

/// Course-module row as the host's directory service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    /// Course-module id.
    pub id:          i64,
    /// Id of the course the module belongs to.
    pub course_id:   i64,
    /// Kind of activity (assign, workshop, ...).
    pub module_kind: String,
    /// Id of the activity instance within its kind.
    pub instance_id: i64,
}

/// Course row as the host's directory service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Short course label (e.g. "ITSC 2214").
    pub short_name: String,
    /// Full course title.
    pub full_name:  String,
}

/// Someone an email can be addressed to or sent from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// First name as enrolled.
    pub first_name: String,
    /// Last name as enrolled.
    pub last_name:  String,
    /// Email address.
    pub email:      String,
}

impl Recipient {
    /// Returns the recipient's display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Course/module/user lookups the host application provides.
pub trait CourseDirectory {
    /// Resolves a course module by id.
    fn course_module(&self, cmid: i64) -> Result<CourseModule>;
    /// Resolves the course a module belongs to.
    fn course(&self, course_id: i64) -> Result<Course>;
    /// Resolves the display name of the activity behind a module.
    fn activity_name(&self, module: &CourseModule) -> Result<String>;
    /// Resolves every user with grading capability on the activity.
    fn graders(&self, cmid: i64) -> Result<Vec<Recipient>>;
}

/// Mail-sending service the host application provides.
pub trait MailSender {
    /// Sends one email with a plain-text and a formatted body.
    fn send(
        &self,
        to: &Recipient,
        from: &Recipient,
        subject: &str,
        body_text: &str,
        body_html: &str,
    ) -> Result<()>;
}

/// Template parameters shared by every notification email for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailParams {
    /// Short course label.
    pub course_short_name: String,
    /// Full course title.
    pub course_name:       String,
    /// Display name of the scanned assignment.
    pub assignment_name:   String,
    /// Human-readable completion time.
    pub time:              String,
    /// Deep link to the results view for this scan.
    pub link:              String,
    /// Display name of the grader the email is addressed to.
    pub recipient_name:    String,
}

impl EmailParams {
    /// Serializes the bundle for host-side templating engines, which take
    /// their substitution parameters as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Could not serialize email parameters")
    }
}

/// Builds the deep link into the host's results view for one scan.
fn results_link(cmid: i64, detector: Detector) -> String {
    format!(
        "{}/plagiarism/moss/view.php?cmid={cmid}&detector={detector}",
        config::base_url()
    )
}

/// Renders the email subject for one grader.
fn subject(params: &EmailParams) -> String {
    format!(
        "[{}] Plagiarism scan of {} is complete",
        params.course_short_name, params.assignment_name
    )
}

/// Renders the plain-text email body for one grader.
fn body_text(params: &EmailParams) -> String {
    format!(
        "Hi {},\n\n\
         The plagiarism scan of \"{}\" in {} finished at {}.\n\n\
         Results: {}\n",
        params.recipient_name, params.assignment_name, params.course_name, params.time, params.link
    )
}

/// Renders the formatted email body for one grader.
fn body_html(params: &EmailParams) -> String {
    format!(
        "<p>Hi {},</p>\
         <p>The plagiarism scan of <em>{}</em> in {} finished at {}.</p>\
         <p><a href=\"{}\">View the results</a></p>",
        params.recipient_name, params.assignment_name, params.course_name, params.time, params.link
    )
}

/// Emails every grader of the scanned activity that the scan completed.
///
/// Builds one shared parameter bundle (course, assignment, completion
/// time, results deep link) and sends one templated email per grader.
/// Lookup and send failures propagate to the caller; there is no retry.
pub fn send_scan_complete_notification(
    job: &ScanJob,
    detector: Detector,
    directory: &dyn CourseDirectory,
    mailer: &dyn MailSender,
) -> Result<()> {
    let module = directory
        .course_module(job.cmid)
        .with_context(|| format!("Could not resolve course module {}", job.cmid))?;
    let course = directory
        .course(module.course_id)
        .with_context(|| format!("Could not resolve course {}", module.course_id))?;
    let assignment_name = directory.activity_name(&module)?;
    let graders = directory.graders(job.cmid)?;

    let cfg = config::get();
    let sender = Recipient {
        first_name: cfg.support_name().to_string(),
        last_name:  String::new(),
        email:      cfg.support_email().to_string(),
    };

    let time = OffsetDateTime::now_utc()
        .format(&Rfc2822)
        .context("Could not format completion timestamp")?;

    let mut params = EmailParams {
        course_short_name: course.short_name,
        course_name: course.full_name,
        assignment_name,
        time,
        link: results_link(job.cmid, detector),
        recipient_name: String::new(),
    };

    tracing::info!("Sending email to {} markers", graders.len());
    for grader in &graders {
        tracing::info!("Email to {} {}", grader.first_name, grader.last_name);
        params.recipient_name = grader.full_name();
        mailer.send(
            grader,
            &sender,
            &subject(&params),
            &body_text(&params),
            &body_html(&params),
        )?;
    }

    Ok(())
}
