//! Shared email content templates
//!
//! Canonical content generators for enrollment and inquiry emails, used
//! by both production (SES) and mock email services.

/// Generate plain-text body for an enrollment confirmation email.
pub fn enrollment_confirmation_text(
    student_name: &str,
    course_title: &str,
    class_code: &str,
    enrollment_url: &str,
) -> String {
    format!(
        "Hi {}!\n\n\
        We received your enrollment for '{}' (class {}).\n\n\
        Your enrollment is pending review. You can check its status here:\n\
        {}\n\n\
        We will reach out as soon as it is confirmed.\n\n\
        Thanks,\n\
        The Hexagon Team",
        student_name, course_title, class_code, enrollment_url
    )
}

/// Generate styled HTML body for an enrollment confirmation email.
pub fn enrollment_confirmation_html(
    student_name: &str,
    course_title: &str,
    class_code: &str,
    enrollment_url: &str,
) -> String {
    format!(
        r#"<html>
<body style="margin: 0; background: #f4f4f1; font-family: Georgia, 'Times New Roman', serif; color: #2b2b2b;">
  <div style="max-width: 560px; margin: 24px auto; background: #ffffff; border: 1px solid #e0ded8; padding: 32px;">
    <h1 style="font-size: 22px; color: #2d6a4f; margin-top: 0;">Enrollment received</h1>
    <p>Hi {student_name}!</p>
    <p>We received your enrollment for &lsquo;<strong>{course_title}</strong>&rsquo; (class <strong>{class_code}</strong>).</p>
    <p>
      <a href="{enrollment_url}" style="color: #ffffff; background: #2d6a4f; padding: 10px 22px; border-radius: 6px; text-decoration: none;">Check status</a>
    </p>
    <p style="font-size: 14px; color: #6b6b6b;"><em>Your enrollment is pending review. We will reach out as soon as it is confirmed.</em></p>
    <p style="font-size: 12px; color: #6b6b6b; border-top: 1px solid #e0ded8; padding-top: 16px;">Thanks, The Hexagon Team</p>
  </div>
</body>
</html>
"#
    )
}

/// Generate plain-text body for the operator inquiry notification.
pub fn inquiry_admin_notification_text(
    full_name: &str,
    phone: &str,
    email: Option<&str>,
    inquiry_message: &str,
    course_title: Option<&str>,
) -> String {
    let mut body = format!(
        "A new contact inquiry arrived.\n\n\
        Name: {}\n\
        Phone: {}\n",
        full_name, phone
    );
    if let Some(email) = email {
        body.push_str(&format!("Email: {}\n", email));
    }
    if let Some(course_title) = course_title {
        body.push_str(&format!("Course: {}\n", course_title));
    }
    body.push_str(&format!("\nMessage:\n{}\n", inquiry_message));
    body
}

/// Generate plain-text body for the inquirer's confirmation email.
pub fn inquiry_confirmation_text(full_name: &str) -> String {
    format!(
        "Hi {}!\n\n\
        Thanks for getting in touch. We received your inquiry and will\n\
        get back to you as soon as possible.\n\n\
        Thanks,\n\
        The Hexagon Team",
        full_name
    )
}

/// Generate styled HTML body for the inquirer's confirmation email.
pub fn inquiry_confirmation_html(full_name: &str) -> String {
    format!(
        r#"<html>
<body style="margin: 0; background: #f4f4f1; font-family: Georgia, 'Times New Roman', serif; color: #2b2b2b;">
  <div style="max-width: 560px; margin: 24px auto; background: #ffffff; border: 1px solid #e0ded8; padding: 32px;">
    <h1 style="font-size: 22px; color: #2d6a4f; margin-top: 0;">We received your inquiry</h1>
    <p>Hi {full_name}!</p>
    <p>Thanks for getting in touch. We received your inquiry and will get back to you as soon as possible.</p>
    <p style="font-size: 12px; color: #6b6b6b; border-top: 1px solid #e0ded8; padding-top: 16px;">Thanks, The Hexagon Team</p>
  </div>
</body>
</html>
"#
    )
}
