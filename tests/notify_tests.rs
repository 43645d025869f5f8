use std::sync::Mutex;

use anyhow::{Result, bail};
use moss_utils::{
    Detector,
    notify::{
        Course, CourseDirectory, CourseModule, MailSender, Recipient, ScanJob,
        send_scan_complete_notification,
    },
};

/// Directory fixture describing one course with a configurable grader
/// list.
struct FixtureDirectory {
    graders: Vec<Recipient>,
}

impl CourseDirectory for FixtureDirectory {
    fn course_module(&self, cmid: i64) -> Result<CourseModule> {
        if cmid != 42 {
            bail!("unknown course module {cmid}");
        }
        Ok(CourseModule {
            id:          42,
            course_id:   3,
            module_kind: "assign".to_string(),
            instance_id: 9,
        })
    }

    fn course(&self, course_id: i64) -> Result<Course> {
        assert_eq!(course_id, 3);
        Ok(Course {
            short_name: "ITSC 2214".to_string(),
            full_name:  "Data Structures".to_string(),
        })
    }

    fn activity_name(&self, module: &CourseModule) -> Result<String> {
        assert_eq!(module.instance_id, 9);
        Ok("Assignment 1".to_string())
    }

    fn graders(&self, _cmid: i64) -> Result<Vec<Recipient>> {
        Ok(self.graders.clone())
    }
}

/// Mail sender that records every send instead of delivering.
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl MailSender for RecordingMailer {
    fn send(
        &self,
        to: &Recipient,
        _from: &Recipient,
        subject: &str,
        body_text: &str,
        _body_html: &str,
    ) -> Result<()> {
        self.sent.lock().expect("mailer poisoned").push((
            to.email.clone(),
            subject.to_string(),
            body_text.to_string(),
        ));
        Ok(())
    }
}

fn grader(first: &str, last: &str, email: &str) -> Recipient {
    Recipient {
        first_name: first.to_string(),
        last_name:  last.to_string(),
        email:      email.to_string(),
    }
}

#[test]
fn sends_one_email_per_grader() {
    let directory = FixtureDirectory {
        graders: vec![
            grader("Ada", "Lovelace", "ada@example.edu"),
            grader("Alan", "Turing", "alan@example.edu"),
        ],
    };
    let mailer = RecordingMailer::default();

    send_scan_complete_notification(&ScanJob { cmid: 42 }, Detector::Moss, &directory, &mailer)
        .expect("notification should succeed");

    let sent = mailer.sent.lock().expect("mailer poisoned");
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, "ada@example.edu");
    assert_eq!(sent[1].0, "alan@example.edu");
}

#[test]
fn emails_carry_the_results_deep_link_and_names() {
    let directory = FixtureDirectory {
        graders: vec![grader("Ada", "Lovelace", "ada@example.edu")],
    };
    let mailer = RecordingMailer::default();

    send_scan_complete_notification(&ScanJob { cmid: 42 }, Detector::Jplag, &directory, &mailer)
        .expect("notification should succeed");

    let sent = mailer.sent.lock().expect("mailer poisoned");
    let (_, subject, body) = &sent[0];
    assert!(subject.contains("ITSC 2214"));
    assert!(subject.contains("Assignment 1"));
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("cmid=42&detector=jplag"));
}

#[test]
fn email_params_serialize_for_templating() {
    let params = moss_utils::notify::EmailParams {
        course_short_name: "ITSC 2214".to_string(),
        course_name:       "Data Structures".to_string(),
        assignment_name:   "Assignment 1".to_string(),
        time:              "Fri, 29 Aug 2026 12:00:00 +0000".to_string(),
        link:              "http://localhost/plagiarism/moss/view.php?cmid=42&detector=moss"
            .to_string(),
        recipient_name:    "Ada Lovelace".to_string(),
    };
    let json = params.to_json().expect("params should serialize");
    assert!(json.contains("\"assignment_name\":\"Assignment 1\""));
}

#[test]
fn no_graders_means_no_mail() {
    let directory = FixtureDirectory { graders: vec![] };
    let mailer = RecordingMailer::default();

    send_scan_complete_notification(&ScanJob { cmid: 42 }, Detector::Moss, &directory, &mailer)
        .expect("notification should succeed");

    assert!(mailer.sent.lock().expect("mailer poisoned").is_empty());
}

#[test]
fn unknown_course_module_propagates() {
    let directory = FixtureDirectory { graders: vec![] };
    let mailer = RecordingMailer::default();

    let err =
        send_scan_complete_notification(&ScanJob { cmid: 1 }, Detector::Moss, &directory, &mailer)
            .expect_err("unknown cmid should fail");
    assert!(err.to_string().contains("Could not resolve course module 1"));
}
