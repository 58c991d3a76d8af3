//! Control panel page
//!
//! A single self-contained HTML page: pick a project, pick a content folder,
//! enter site name and destination, deploy. Talks to the JSON endpoints.

use crate::artifacts::escape_html;

/// Render the panel with the given project names preloaded
pub fn render_index(projects: &[String]) -> String {
    let options: String = projects
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!(r#"<option value="{0}">{0}</option>"#, name)
        })
        .collect::<Vec<_>>()
        .join("\n                ");

    let empty_note = if projects.is_empty() {
        r#"<p class="note">No projects found under the projects root.</p>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Redirect Deployer</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; }}
        label {{ display: block; margin-top: 1rem; font-weight: 600; }}
        select, input {{ width: 100%; padding: 0.4rem; }}
        button {{ margin-top: 1.5rem; padding: 0.5rem 1.5rem; }}
        pre {{ white-space: pre-wrap; background: #f4f4f4; padding: 0.75rem; }}
        .note {{ color: #a60; }}
    </style>
</head>
<body>
    <h1>Redirect Deployer</h1>
    {empty_note}
    <form id="deploy-form">
        <label for="project">Project</label>
        <select id="project" name="project" required>
            <option value="">Select a project</option>
                {options}
        </select>

        <label for="folder">Public folder</label>
        <select id="folder" name="folder" required></select>

        <label for="siteName">Site name</label>
        <input id="siteName" name="siteName" placeholder="my-site" required>

        <label for="redirectUrl">Redirect URL</label>
        <input id="redirectUrl" name="redirectUrl" placeholder="example.com" required>

        <button type="submit">Deploy</button>
    </form>
    <pre id="result" hidden></pre>
    <script>
        const post = (url, body) => fetch(url, {{
            method: "POST",
            headers: {{ "Content-Type": "application/json" }},
            body: JSON.stringify(body),
        }}).then((r) => r.json());

        const folderSelect = document.getElementById("folder");
        const result = document.getElementById("result");

        document.getElementById("project").addEventListener("change", async (event) => {{
            folderSelect.innerHTML = "";
            if (!event.target.value) return;
            const data = await post("/get-public-folders", {{ project: event.target.value }});
            for (const name of data.folders || []) {{
                const option = document.createElement("option");
                option.value = name;
                option.textContent = name;
                folderSelect.appendChild(option);
            }}
        }});

        document.getElementById("deploy-form").addEventListener("submit", async (event) => {{
            event.preventDefault();
            const form = new FormData(event.target);
            result.hidden = false;
            result.textContent = "Deploying...";
            const data = await post("/deploy", Object.fromEntries(form.entries()));
            result.textContent = data.success ? data.message : "Error: " + data.error;
        }});
    </script>
</body>
</html>"#
    )
}
