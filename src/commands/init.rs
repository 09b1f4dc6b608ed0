//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# TensorLab site configuration

# Site
title: TensorLab
description: 'AI Application Engineering'
language: vi
url: http://localhost:4000
timezone: Asia/Ho_Chi_Minh

# Directory
content_dir: content/blog
content_extension: mdx
public_dir: public

# Writing
reading:
  words_per_minute: 200
  label: phút đọc
excerpt_length: 200
highlight:
  theme: base16-ocean.dark
  line_number: false

# Contact relay (credentials are read from these environment variables)
contact:
  api_base: https://api.telegram.org
  token_env: TELEGRAM_BOT_TOKEN
  chat_id_env: TELEGRAM_CHAT_ID
  type_labels:
    product: Hợp tác Product
    outsource: Thuê Outsource
    other: Khác

# Preferences
theme_cookie: theme

# Events
events:
  - slug: ai-application-engineer-intro
    thumbnailUrl: https://cdn4.vieclam24h.vn/webinar_la_gi_2_0b5cc5cff0.jpeg
    title: "Webinar: Nhập môn AI Application Engineer"
    desc: Lộ trình tutorial chi tiết từ cơ bản đến nâng cao. Slide, docs, source code FE/BE kèm Demo và project ideas.
    startAt: "2026-04-15T09:00:00+07:00"
    format: Google Meet
    registrationUrl: https://calendar.app.google/9VcndKnwqBTPuBXv8
  - slug: workshop-vibe-coding-for-non-tech-people
    thumbnailUrl: https://cdn4.vieclam24h.vn/webinar_la_gi_2_0b5cc5cff0.jpeg
    title: "Workshop: Tạo ứng dụng thực tế cho người non-tech với AI"
    desc: Không cần biết code, không cần cài công cụ. Chỉ cần một tài khoản Gmail để tự tay tạo ứng dụng web bằng AI ngay trong workshop.
    startAt: "2026-03-27T20:00:00+07:00"
    format: Google Meet
    registrationUrl: https://calendar.app.google/99xh8uwEjGhg34oU8
"#;

/// Write `content` unless the file already exists
fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("{:?} already exists, leaving it untouched", path);
        return Ok(());
    }
    fs::write(path, content)?;
    Ok(())
}

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    let content_dir = target_dir.join("content/blog");
    fs::create_dir_all(&content_dir)?;
    fs::create_dir_all(target_dir.join("public"))?;

    write_if_missing(&target_dir.join(CONFIG_FILE), DEFAULT_CONFIG)?;

    // Create a sample post
    let today = chrono::Local::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: "Xin chào TensorLab"
date: "{}"
description: "Bài viết đầu tiên của blog."
---

Chào mừng bạn đến với blog của **TensorLab**.

## Bắt đầu

Tạo bài viết mới:

```bash
$ tensorlab new "Tiêu đề bài viết"
```

<Callout type="tip">
Mỗi file `.mdx` trong `content/blog` là một bài viết; tên file là slug.
</Callout>

## Chạy server

```bash
$ tensorlab server
```
"#,
        today
    );

    write_if_missing(&content_dir.join("hello-tensorlab.mdx"), &sample_post)?;

    Ok(())
}
