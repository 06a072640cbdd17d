//! Prompt construction.

use crate::ContentRequest;
use postmill_core::{ContentType, Platform};

const PROFILE: &str = "\
A professional web developer and AI specialist.
Technical skills: MERN stack, Next.js and TypeScript, AI development with large language model APIs,
Flutter for cross-platform mobile, game development with Unreal Engine, cloud platforms and API design.
Experience: international and national projects, AI-powered web and mobile applications,
automated systems and intelligent workflows.
Current projects: an independent game studio, IT solutions, AI-based automation tools,
social media automation platforms.
Seeking: co-founders, teammates and partners for innovative technology projects.";

fn platform_guideline(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => {
            "Visual-focused, plenty of emojis, an engaging caption about tech achievements"
        }
        Platform::Facebook => {
            "Storytelling about projects, seeking collaborations, the professional journey with emojis"
        }
        Platform::Twitter => {
            "Tech insights, quick tips, networking for co-founders, stay within 280 characters"
        }
        Platform::Linkedin => {
            "Professional achievements, seeking partnerships, industry expertise with subtle emojis"
        }
    }
}

/// Build the generation prompt for a request and its resolved topic.
pub fn build_prompt(request: &ContentRequest, topic: &str) -> String {
    let platform = *request.platform();
    let tone = request
        .tone()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "professional yet engaging".to_string());
    let hashtags = if *request.include_hashtags() {
        "- End with 5-8 relevant hashtags\n"
    } else {
        "- Do not include hashtags\n"
    };

    format!(
        "You are creating social media content for this profile:\n\
         {PROFILE}\n\n\
         Create ONE engaging {platform} post.\n\
         Topic: {topic}\n\
         Tone: {tone}\n\
         Content type: {content_type}\n\
         Platform guideline: {guideline}\n\n\
         Formatting requirements:\n\
         - Generate ONLY ONE complete post, never multiple options\n\
         - Use line breaks to structure the post\n\
         - Include a clear call-to-action\n\
         - Keep within {max_len} characters\n\
         {hashtags}\
         Return only the final post text with no explanations, labels or image descriptions.",
        content_type = request.content_type(),
        guideline = platform_guideline(platform),
        max_len = platform.max_text_length(),
    )
}

/// Whether a request should produce an image alongside the text.
pub fn wants_image(request: &ContentRequest) -> bool {
    *request.generate_image()
        || *request.content_type() == ContentType::ImagePost
        || request.platform().requires_image()
}

/// Image prompt for a resolved topic.
pub fn image_prompt(topic: &str) -> String {
    format!(
        "Ultra realistic 3D render of {topic} in a futuristic modern tech workspace, \
         cinematic lighting, highly detailed textures, depth of field, photorealistic, \
         professional color grading"
    )
}
