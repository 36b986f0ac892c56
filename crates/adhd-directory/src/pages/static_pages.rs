/// Informational pages with fixed copy and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticPage {
    About,
    Contact,
    Privacy,
    Terms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub paragraphs: &'static [&'static str],
}

impl StaticPage {
    pub const ALL: [StaticPage; 4] = [Self::About, Self::Contact, Self::Privacy, Self::Terms];

    pub const fn path(self) -> &'static str {
        match self {
            Self::About => "/about",
            Self::Contact => "/contact",
            Self::Privacy => "/privacy",
            Self::Terms => "/terms",
        }
    }

    /// Short title used in the document title and breadcrumbs.
    pub const fn title(self) -> &'static str {
        match self {
            Self::About => "About Us",
            Self::Contact => "Contact Us",
            Self::Privacy => "Privacy Policy",
            Self::Terms => "Terms of Use",
        }
    }

    pub const fn heading(self) -> &'static str {
        match self {
            Self::About => "About ADHD NSW",
            other => other.title(),
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::About => "Learn about ADHD NSW - your trusted guide to ADHD support services and professionals across New South Wales.",
            Self::Contact => "Get in touch with ADHD NSW for questions about our directory and resources.",
            Self::Privacy => "Privacy Policy for ADHD NSW directory and resources.",
            Self::Terms => "Terms of Use for ADHD NSW directory and resources.",
        }
    }

    /// Legal pages show a "last updated" line.
    pub const fn is_legal(self) -> bool {
        matches!(self, Self::Privacy | Self::Terms)
    }

    pub const fn sections(self) -> &'static [Section] {
        match self {
            Self::About => &[
                Section {
                    heading: "Our Mission",
                    paragraphs: &["ADHD NSW is dedicated to connecting individuals and families with trusted ADHD professionals and resources across New South Wales."],
                },
                Section {
                    heading: "What We Do",
                    paragraphs: &["We maintain a comprehensive directory of ADHD specialists, including psychiatrists, psychologists, and other healthcare professionals who specialize in ADHD diagnosis and treatment."],
                },
                Section {
                    heading: "Our Commitment",
                    paragraphs: &["We are committed to providing accurate, up-to-date information to help you make informed decisions about ADHD care in New South Wales."],
                },
            ],
            Self::Contact => &[
                Section {
                    heading: "Get in Touch",
                    paragraphs: &[
                        "Have questions about our directory or need help finding ADHD support services in NSW? We're here to help.",
                        "Email: hello@adhdnsw.org",
                        "New South Wales, Australia",
                    ],
                },
                Section {
                    heading: "Professional Listings",
                    paragraphs: &[
                        "Are you an ADHD professional in NSW? We'd love to include you in our directory.",
                        "Please email us with your practice details and we'll get back to you about listing requirements.",
                    ],
                },
            ],
            Self::Privacy => &[
                Section {
                    heading: "Information We Collect",
                    paragraphs: &["We collect information you provide directly to us, such as when you contact us through our website."],
                },
                Section {
                    heading: "How We Use Your Information",
                    paragraphs: &["We use the information we collect to provide, maintain, and improve our services."],
                },
                Section {
                    heading: "Contact Us",
                    paragraphs: &["If you have any questions about this Privacy Policy, please contact us."],
                },
            ],
            Self::Terms => &[
                Section {
                    heading: "Acceptance of Terms",
                    paragraphs: &["By accessing and using this website, you accept and agree to be bound by the terms and provision of this agreement."],
                },
                Section {
                    heading: "Use License",
                    paragraphs: &["Permission is granted to temporarily use ADHD NSW for personal, non-commercial transitory viewing only."],
                },
                Section {
                    heading: "Contact Information",
                    paragraphs: &["Questions about the Terms of Use should be sent to us via our contact page."],
                },
            ],
        }
    }
}
