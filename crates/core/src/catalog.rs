//! Static course material: topic list, study notes and sample questions.

use crate::question::Question;

/// Course topics, in syllabus order.
pub const COURSE_TOPICS: [&str; 6] = [
    "Topic 1: Introduction to Operating Systems and Linux",
    "Topic 2: File System",
    "Topic 3: Permissions and User Management",
    "Topic 4: Process Management",
    "Topic 5: Shell Scripting (Bash)",
    "Topic 6: System and Network Administration",
];

/// Built-in knowledge blob standing in for indexed course notes.
pub const STUDY_NOTES: &str = r#"
---
# OS Notes - Topic 3: File Management and Permissions

## The chmod command
The 'chmod' (change mode) command changes the access permissions of files and directories.
Symbolic syntax: chmod [who][operator][permission] file
- Who: u (user/owner), g (group), o (others), a (all).
- Operator: + (add), - (remove), = (assign exactly).
- Permission: r (read), w (write), x (execute).

Example: 'chmod u+x file' adds execute permission for the owner only.

## Special Variables in Bash
- $0: Name of the script.
- $1, $2...: Positional arguments.
- $#: Total number of arguments.
- $?: Exit status of the last executed command (0 success, !=0 error).
- $$: PID of the current process.
---
"#;

/// Questions shipped with the tool for trying it out.
pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new(
            "topic3_permissions.05",
            COURSE_TOPICS[2],
            "Which command is used on Ubuntu 24.04 to add execute permission for the owner of a file named 'script.sh' without changing the other permissions?",
            [
                "chmod u+x script.sh".to_string(),
                "chmod 777 script.sh".to_string(),
                "chown +x script.sh".to_string(),
                "chmod a+x script.sh".to_string(),
            ],
        )
        .with_correct_option(1),
        Question::new(
            "topic4_processes.12",
            COURSE_TOPICS[3],
            "In a bash script, which special variable stores the number of arguments passed to the script?",
            ["$#".to_string(), "$@".to_string(), "$?".to_string(), "$$".to_string()],
        )
        .with_correct_option(1),
        Question::new(
            "topic2_files.02",
            COURSE_TOPICS[1],
            "We want to view the last 10 lines of the syslog file. Which command is the most appropriate?",
            [
                "head -n 10 /var/log/syslog".to_string(),
                "cat /var/log/syslog | limit 10".to_string(),
                "tail -n 10 /var/log/syslog".to_string(),
                "less /var/log/syslog".to_string(),
            ],
        )
        .with_correct_option(3),
    ]
}
