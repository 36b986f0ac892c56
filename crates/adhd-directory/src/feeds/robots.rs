use crate::config::SiteConfig;

struct Rule {
    user_agent: &'static str,
    disallow: &'static [&'static str],
    crawl_delay: Option<u32>,
}

const RULES: &[Rule] = &[
    Rule {
        user_agent: "*",
        disallow: &[
            "/api/",
            "/admin/",
            "/_next/",
            "/static/",
            "/*.json$",
            "/*?*sort=",
            "/*?*filter=",
            "/*?*page=",
        ],
        crawl_delay: Some(1),
    },
    Rule {
        user_agent: "Googlebot",
        disallow: &["/api/", "/admin/"],
        crawl_delay: None,
    },
    Rule {
        user_agent: "Bingbot",
        disallow: &["/api/", "/admin/"],
        crawl_delay: None,
    },
];

pub fn render_robots(site: &SiteConfig) -> String {
    let mut text = String::new();
    for rule in RULES {
        text.push_str(&format!("User-Agent: {}\n", rule.user_agent));
        text.push_str("Allow: /\n");
        for path in rule.disallow {
            text.push_str(&format!("Disallow: {path}\n"));
        }
        if let Some(delay) = rule.crawl_delay {
            text.push_str(&format!("Crawl-delay: {delay}\n"));
        }
        text.push('\n');
    }
    text.push_str(&format!("Host: {}\n", site.base_url));
    text.push_str(&format!("Sitemap: {}\n", site.url("/sitemap.xml")));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_rules_and_sitemap() {
        let robots = render_robots(&SiteConfig::default());
        assert!(robots.starts_with("User-Agent: *\nAllow: /\nDisallow: /api/\n"));
        assert!(robots.contains("Crawl-delay: 1\n"));
        assert!(robots.contains("User-Agent: Bingbot\n"));
        assert!(robots.ends_with("Sitemap: https://adhdnsw.org/sitemap.xml\n"));
    }
}
